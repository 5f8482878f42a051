use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use ttf_parser::Face;

static SYSTEM_FONTS: Lazy<Mutex<SystemFonts>> = Lazy::new(|| Mutex::new(SystemFonts::new()));

/// Width advance used for glyphs a font does not cover, relative to font size.
const MISSING_GLYPH_ADVANCE: f32 = 0.56;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

impl TextSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Bounding size of a single line of text rendered at a given font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> TextSize;

    /// Family name to reference when drawing text measured by this service.
    fn family(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Error)]
pub enum TextMetricsError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a usable font file")]
    InvalidFont { path: PathBuf },
}

/// Measures with per-character width estimates; no font data needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMeasurer;

impl TextMeasure for FallbackMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        if text.is_empty() || font_size <= 0.0 {
            return TextSize::default();
        }
        let width = text.chars().map(char_width_factor).sum::<f32>() * font_size;
        TextSize::new(width, font_size)
    }
}

/// Measures with glyph advances and vertical metrics of a real font face.
#[derive(Clone)]
pub struct FontMeasurer {
    face: Arc<FontFace>,
}

impl FontMeasurer {
    /// Resolves a CSS-like family list (`"Roboto, Arial, sans-serif"`)
    /// against the fonts installed on this system.
    pub fn system(font_family: &str) -> Option<Self> {
        let mut fonts = SYSTEM_FONTS.lock().ok()?;
        let face = fonts.load_face(font_family)?;
        Some(Self {
            face: Arc::new(face),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, TextMetricsError> {
        let data = std::fs::read(path).map_err(|source| TextMetricsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback_family = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("sans-serif")
            .to_string();
        let face = FontFace::parse(data, 0, None, fallback_family).ok_or_else(|| {
            TextMetricsError::InvalidFont {
                path: path.to_path_buf(),
            }
        })?;
        debug!("loaded font {} ({})", path.display(), face.family);
        Ok(Self {
            face: Arc::new(face),
        })
    }
}

impl TextMeasure for FontMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        if text.is_empty() || font_size <= 0.0 {
            return TextSize::default();
        }
        let scale = font_size / self.face.units_per_em as f32;
        let width = self
            .face
            .measure_width(text, font_size)
            .unwrap_or_else(|| FallbackMeasurer.measure(text, font_size).width);
        let height = (self.face.ascender as f32 - self.face.descender as f32) * scale;
        TextSize::new(width, height.max(font_size * 0.5))
    }

    fn family(&self) -> Option<&str> {
        Some(self.face.family.as_str())
    }
}

/// Picks the system font for `font_family`, falling back to width estimates
/// when no matching font is installed.
pub fn default_measurer(font_family: &str) -> Box<dyn TextMeasure> {
    match FontMeasurer::system(font_family) {
        Some(measurer) => Box::new(measurer),
        None => {
            warn!("no system font matches {font_family:?}, using estimated text metrics");
            Box::new(FallbackMeasurer)
        }
    }
}

struct SystemFonts {
    db: Database,
    loaded: bool,
}

enum FamilyName {
    Generic(Family<'static>),
    Named(String),
}

impl SystemFonts {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded: false,
        }
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        if !self.loaded {
            self.db.load_system_fonts();
            self.loaded = true;
        }

        let names = parse_family_list(font_family);
        let families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name {
                FamilyName::Generic(family) => *family,
                FamilyName::Named(name) => Family::Name(name.as_str()),
            })
            .collect();
        let query = Query {
            families: &families,
            weight: Weight::MEDIUM,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let family = self
            .db
            .face(id)
            .and_then(|info| info.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "sans-serif".to_string());
        self.db
            .with_face_data(id, |data, index| {
                FontFace::parse(data.to_vec(), index, Some(family.clone()), family.clone())
            })
            .flatten()
    }
}

fn parse_family_list(font_family: &str) -> Vec<FamilyName> {
    let mut names = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        let name = match raw.to_ascii_lowercase().as_str() {
            "serif" => FamilyName::Generic(Family::Serif),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                FamilyName::Generic(Family::SansSerif)
            }
            "monospace" | "ui-monospace" => FamilyName::Generic(Family::Monospace),
            "cursive" => FamilyName::Generic(Family::Cursive),
            "fantasy" => FamilyName::Generic(Family::Fantasy),
            _ => FamilyName::Named(raw.to_string()),
        };
        names.push(name);
    }
    if names.is_empty() {
        names.push(FamilyName::Generic(Family::SansSerif));
    }
    names
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    family: String,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    ascii_advances: [u16; 128],
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32, family: Option<String>, fallback_family: String) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let ascender = face.ascender();
        let descender = face.descender();
        let family = family
            .or_else(|| {
                face.names()
                    .into_iter()
                    .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
                    .find_map(|name| name.to_string())
            })
            .unwrap_or(fallback_family);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        drop(face);
        Some(Self {
            data,
            index,
            family,
            units_per_em,
            ascender,
            descender,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let missing = font_size * MISSING_GLYPH_ADVANCE;

        if text.is_ascii() {
            let width = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| match self.ascii_advances[byte as usize] {
                    0 => missing,
                    advance => advance as f32 * scale,
                })
                .sum::<f32>();
            return Some(width.max(0.0));
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        let width = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(missing)
            })
            .sum::<f32>();
        Some(width.max(0.0))
    }
}

/// Approximate advance of `ch` relative to the font size, for a medium
/// weight sans-serif face.
pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.25,
        'i' | 'j' | 'l' | 'I' | '\'' | '|' => 0.24,
        '.' | ',' | ':' | ';' | '!' => 0.25,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.34,
        'm' | 'w' => 0.85,
        'M' | 'W' => 0.9,
        'A'..='Z' => 0.66,
        'a'..='z' => 0.56,
        '0'..='9' => 0.56,
        '@' | '#' | '%' | '&' => 0.9,
        _ => 0.6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_width_scales_with_font_size() {
        let small = FallbackMeasurer.measure("Betelgeuse", 16.0);
        let large = FallbackMeasurer.measure("Betelgeuse", 32.0);
        assert!((large.width - small.width * 2.0).abs() < 0.01);
        assert_eq!(large.height, 32.0);
    }

    #[test]
    fn fallback_empty_text_has_no_size() {
        assert_eq!(FallbackMeasurer.measure("", 20.0), TextSize::default());
        assert_eq!(FallbackMeasurer.measure("Rigel", 0.0), TextSize::default());
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{3b1}'] {
            assert!(char_width_factor(ch) > 0.0, "char {ch:?} has zero width");
        }
    }

    #[test]
    fn family_list_understands_generics_and_quotes() {
        let names = parse_family_list("\"Roboto Medium\", Arial, sans-serif");
        assert_eq!(names.len(), 3);
        assert!(matches!(&names[0], FamilyName::Named(name) if name == "Roboto Medium"));
        assert!(matches!(&names[2], FamilyName::Generic(Family::SansSerif)));
        assert!(matches!(
            parse_family_list("  ").as_slice(),
            [FamilyName::Generic(Family::SansSerif)]
        ));
    }

    #[test]
    fn missing_font_file_reports_path() {
        let err = FontMeasurer::from_file(Path::new("/nonexistent/Roboto-Medium.ttf"))
            .err()
            .expect("missing file");
        assert!(err.to_string().contains("Roboto-Medium.ttf"));
    }
}
