// One layout pass: filter catalog stars, order them by weight, place each
// label without overlap, then scatter the decorative background words.
//
// The result is a retained scene. Positions never change after the pass;
// per-frame work (hover, selection) only reads it.

pub mod geometry;
pub mod order;
pub mod placement;
pub mod registry;

pub use geometry::{LabelBox, Point, intersects, overlap_area};
pub use order::RenderOrder;
pub use placement::{ExhaustionPolicy, Placement, PlacementOutcome, place};
pub use registry::{LabelKey, Registry};

use crate::catalog::CatalogRecord;
use crate::config::{CatalogConfig, LayoutConfig};
use crate::text_metrics::{TextMeasure, TextSize};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inclusive bounds check against `[0, width] x [0, height]`.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarInfo {
    pub id: u64,
    pub magnitude: f32,
    pub spectra: String,
    pub distance: f32,
}

/// Payload that decides what a label can do: stars have a magnitude and a
/// color and can be hovered; decorative words only have text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LabelKind {
    Star(StarInfo),
    Decorative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    /// Font size the label is measured and drawn at.
    pub visual_weight: f32,
    #[serde(flatten)]
    pub kind: LabelKind,
}

impl Label {
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            text: record.name.clone(),
            visual_weight: record.significance,
            kind: LabelKind::Star(StarInfo {
                id: record.id,
                magnitude: record.apparent_magnitude,
                spectra: record.spectra.clone(),
                distance: record.distance_mapped,
            }),
        }
    }

    pub fn decorative(text: impl Into<String>, visual_weight: f32) -> Self {
        Self {
            text: text.into(),
            visual_weight,
            kind: LabelKind::Decorative,
        }
    }

    pub fn key(&self) -> LabelKey {
        match &self.kind {
            LabelKind::Star(star) => LabelKey::Id(star.id),
            LabelKind::Decorative => LabelKey::Text(self.text.clone()),
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.star().map(|star| star.id)
    }

    pub fn star(&self) -> Option<&StarInfo> {
        match &self.kind {
            LabelKind::Star(star) => Some(star),
            LabelKind::Decorative => None,
        }
    }

    pub fn has_magnitude(&self) -> bool {
        self.star().is_some()
    }

    pub fn has_color(&self) -> bool {
        self.star().is_some_and(|star| !star.spectra.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub label: Label,
    pub anchor: Point,
    pub bounds: LabelBox,
    pub outcome: PlacementOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    /// Stars outside the magnitude window or without a usable distance.
    pub filtered: usize,
    pub placed: usize,
    pub overlapping: usize,
    pub skipped: usize,
    pub attempts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub canvas: Canvas,
    pub seed: u64,
    /// Star labels in placement order.
    pub stars: Vec<PlacedLabel>,
    pub background: Vec<PlacedLabel>,
    pub stats: LayoutStats,
}

/// The random source for a pass: the configured seed, or a fresh one.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random::<u64>)
}

pub fn compute_layout(
    records: &[CatalogRecord],
    words: &[String],
    measurer: &dyn TextMeasure,
    catalog: &CatalogConfig,
    config: &LayoutConfig,
    background_word_size: f32,
    canvas: Canvas,
) -> Layout {
    let seed = resolve_seed(config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = compute_layout_with_rng(
        records,
        words,
        measurer,
        catalog,
        config,
        background_word_size,
        canvas,
        &mut rng,
    );
    layout.seed = seed;
    info!(
        "layout seed {seed}: {} stars placed ({} overlapping, {} skipped, {} filtered)",
        layout.stats.placed, layout.stats.overlapping, layout.stats.skipped, layout.stats.filtered
    );
    layout
}

#[allow(clippy::too_many_arguments)]
pub fn compute_layout_with_rng<R: Rng + ?Sized>(
    records: &[CatalogRecord],
    words: &[String],
    measurer: &dyn TextMeasure,
    catalog: &CatalogConfig,
    config: &LayoutConfig,
    background_word_size: f32,
    canvas: Canvas,
    rng: &mut R,
) -> Layout {
    let mut stats = LayoutStats::default();
    let mut labels: Vec<Label> = Vec::with_capacity(records.len());
    for record in records {
        if is_visible(record, catalog) {
            labels.push(Label::from_record(record));
        } else {
            stats.filtered += 1;
        }
    }
    config.order.apply(&mut labels, |label| label.visual_weight);

    let mut registry = Registry::new();
    let mut stars = Vec::with_capacity(labels.len());
    for label in labels {
        let size = measurer.measure(&label.text, label.visual_weight);
        match place(label.key(), size, canvas, &mut registry, rng, config) {
            Some(placement) => {
                stats.attempts += placement.attempts;
                stats.placed += 1;
                if placement.outcome == PlacementOutcome::Overlapping {
                    stats.overlapping += 1;
                }
                stars.push(PlacedLabel {
                    label,
                    anchor: placement.anchor,
                    bounds: placement.bounds,
                    outcome: placement.outcome,
                });
            }
            None => {
                stats.attempts += config.max_attempts.max(1);
                stats.skipped += 1;
            }
        }
    }
    debug!(
        "placed {} star labels in {} attempts, registry holds {} boxes",
        stats.placed,
        stats.attempts,
        registry.len()
    );

    let background = scatter_words(words, measurer, background_word_size, canvas, rng);

    Layout {
        canvas,
        seed: 0,
        stars,
        background,
        stats,
    }
}

fn is_visible(record: &CatalogRecord, catalog: &CatalogConfig) -> bool {
    catalog.window.contains(record.apparent_magnitude)
        && record.distance_mapped.is_finite()
        && record.distance_mapped > 0.0
}

/// Decorative words land anywhere on the canvas and may overlap each other
/// and the stars.
fn scatter_words<R: Rng + ?Sized>(
    words: &[String],
    measurer: &dyn TextMeasure,
    font_size: f32,
    canvas: Canvas,
    rng: &mut R,
) -> Vec<PlacedLabel> {
    words
        .iter()
        .map(|word| {
            let anchor = Point::new(
                uniform(rng, canvas.width),
                uniform(rng, canvas.height),
            );
            let size: TextSize = measurer.measure(word, font_size);
            PlacedLabel {
                label: Label::decorative(word.clone(), font_size),
                anchor,
                bounds: LabelBox::from_anchor(anchor, size),
                outcome: PlacementOutcome::Clear,
            }
        })
        .collect()
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.random_range(0.0..upper)
    } else {
        0.0
    }
}
