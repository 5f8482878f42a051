// Star catalog ingestion: delimited text rows to records with a computed
// significance (label size) and a distance mapped onto the canvas.

use crate::config::CatalogConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is empty")]
    Empty,
    #[error("catalog has no usable rows ({dropped} rows dropped)")]
    NoRecords { dropped: usize },
}

/// Apparent magnitude range a star must fall in to be drawn. Lower means
/// brighter, so `brightest` is the numerically smaller bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeWindow {
    pub brightest: f32,
    pub faintest: f32,
}

impl MagnitudeWindow {
    pub fn contains(&self, magnitude: f32) -> bool {
        magnitude >= self.brightest && magnitude <= self.faintest
    }
}

impl Default for MagnitudeWindow {
    fn default() -> Self {
        Self {
            brightest: -2.0,
            faintest: 12.0,
        }
    }
}

/// Zero-based column positions, used when the file has no recognizable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    pub id: usize,
    pub name: usize,
    pub ra: usize,
    pub dec: usize,
    pub distance: usize,
    pub magnitude: usize,
    pub spectra: usize,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            id: 0,
            name: 6,
            ra: 7,
            dec: 8,
            distance: 9,
            magnitude: 13,
            spectra: 15,
        }
    }
}

impl CatalogColumns {
    /// Overrides positions with the header's `id, proper, ra, dec, dist, mag,
    /// spect` columns. Returns `None` when the line is not a header.
    fn from_header(fields: &[String], defaults: CatalogColumns) -> Option<Self> {
        let find = |names: &[&str]| {
            fields
                .iter()
                .position(|field| names.iter().any(|name| field.eq_ignore_ascii_case(name)))
        };
        let magnitude = find(&["mag", "magnitude"])?;
        Some(Self {
            id: find(&["id"]).unwrap_or(defaults.id),
            name: find(&["proper", "name"]).unwrap_or(defaults.name),
            ra: find(&["ra"]).unwrap_or(defaults.ra),
            dec: find(&["dec"]).unwrap_or(defaults.dec),
            distance: find(&["dist", "distance"]).unwrap_or(defaults.distance),
            magnitude,
            spectra: find(&["spect", "spectra", "spectrum"]).unwrap_or(defaults.spectra),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub name: String,
    pub apparent_magnitude: f32,
    /// Raw distance from the catalog (parsecs).
    pub distance: f32,
    /// Distance scaled onto the canvas height.
    pub distance_mapped: f32,
    pub spectra: String,
    pub significance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub records: Vec<CatalogRecord>,
    pub dropped: usize,
    /// One-based line numbers of the dropped rows, as they appear in the file.
    pub dropped_lines: Vec<usize>,
}

pub fn load_catalog(
    path: &Path,
    config: &CatalogConfig,
    canvas_height: f32,
) -> Result<Catalog, CatalogError> {
    let input = std::fs::read_to_string(path)?;
    parse_catalog(&input, config, canvas_height)
}

pub fn parse_catalog(
    input: &str,
    config: &CatalogConfig,
    canvas_height: f32,
) -> Result<Catalog, CatalogError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();
    let (_, first) = lines.peek().copied().ok_or(CatalogError::Empty)?;

    let header = split_row(first);
    let columns = match CatalogColumns::from_header(&header, config.columns) {
        Some(columns) => {
            lines.next();
            columns
        }
        None => config.columns,
    };

    let mut catalog = Catalog::default();
    for (line_no, line) in lines {
        let fields = split_row(line);
        match parse_record(&fields, &columns, config, canvas_height) {
            Some(record) => catalog.records.push(record),
            None => {
                debug!("dropping catalog line {line_no}: {line}");
                catalog.dropped += 1;
                catalog.dropped_lines.push(line_no);
            }
        }
    }

    if catalog.records.is_empty() {
        return Err(CatalogError::NoRecords {
            dropped: catalog.dropped,
        });
    }
    debug!(
        "catalog: {} records kept, {} dropped",
        catalog.records.len(),
        catalog.dropped
    );
    Ok(catalog)
}

fn parse_record(
    fields: &[String],
    columns: &CatalogColumns,
    config: &CatalogConfig,
    canvas_height: f32,
) -> Option<CatalogRecord> {
    let field = |idx: usize| fields.get(idx).map(|value| value.trim()).unwrap_or("");
    let number = |idx: usize| {
        let raw = field(idx);
        if raw.is_empty() {
            return None;
        }
        raw.parse::<f32>().ok().filter(|value| value.is_finite())
    };

    // Position fields are never drawn but mark a row as a real observation.
    number(columns.ra)?;
    number(columns.dec)?;
    let apparent_magnitude = number(columns.magnitude)?;
    let distance = number(columns.distance)?;
    let id = field(columns.id).parse::<u64>().ok()?;
    let name = field(columns.name);
    if name.is_empty() {
        return None;
    }

    let significance = significance(distance, apparent_magnitude, canvas_height, config);
    if !significance.is_finite() {
        return None;
    }

    Some(CatalogRecord {
        id,
        name: name.to_string(),
        apparent_magnitude,
        distance,
        distance_mapped: map_distance(distance, canvas_height, config),
        spectra: field(columns.spectra).to_string(),
        significance,
    })
}

/// Linear map of a catalog distance onto `[0, height]`.
pub fn map_distance(distance: f32, height: f32, config: &CatalogConfig) -> f32 {
    distance / config.distance_range * height
}

/// Label size of a star: close and bright stars get large text.
///
/// `|base + (1 / (2 * d) + 1 / (mag + 3)) * scale|` where `d` is the distance
/// mapped onto the viewport height.
pub fn significance(distance: f32, magnitude: f32, canvas_height: f32, config: &CatalogConfig) -> f32 {
    let viewport_height = canvas_height * config.viewport_scale;
    let mapped = map_distance(distance, viewport_height, config);
    (config.base_significance + (1.0 / (2.0 * mapped) + 1.0 / (magnitude + 3.0)) * config.scale_factor)
        .abs()
}

/// Splits one comma-separated row. Double quotes group fields that contain
/// commas; `""` inside a quoted field is a literal quote.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
