pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod hover;
pub mod layout;
pub mod layout_dump;
pub mod lexicon;
pub mod render;
pub mod session;
pub mod spectral;
pub mod syllables;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use hover::Selection;
pub use layout::{Canvas, Layout, Point};
pub use session::{Session, SessionBuilder, SessionError};

use text_metrics::{FallbackMeasurer, TextMeasure, default_measurer};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    /// Estimate text extents from per-character widths instead of font files.
    pub fast_text_metrics: bool,
}

/// Lays out a catalog and draws it in one go, with nothing selected.
pub fn render_catalog(
    catalog_csv: &str,
    related_words_json: Option<&str>,
    options: RenderOptions,
) -> anyhow::Result<String> {
    let RenderOptions {
        config,
        fast_text_metrics,
    } = options;
    let catalog = catalog::parse_catalog(catalog_csv, &config.catalog, config.render.height)?;
    let words = match related_words_json {
        Some(json) => lexicon::parse_related_words(json)?,
        None => Vec::new(),
    };
    let measurer: Box<dyn TextMeasure> = if fast_text_metrics {
        Box::new(FallbackMeasurer)
    } else {
        default_measurer(&config.theme.font_family)
    };
    let session = SessionBuilder::new(config)
        .catalog(catalog.records)
        .related_words(words)
        .measurer(measurer)
        .build()?;
    Ok(render::render_session_svg(&session))
}
