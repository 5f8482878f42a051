use crate::catalog::{CatalogColumns, MagnitudeWindow};
use crate::layout::{ExhaustionPolicy, RenderOrder};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Distance (parsecs) mapped onto the full canvas height.
pub const DEFAULT_DISTANCE_RANGE: f32 = 82083.9594;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Candidate positions drawn per label before the exhaustion policy applies.
    pub max_attempts: usize,
    pub exhaustion: ExhaustionPolicy,
    pub order: RenderOrder,
    /// Multiplier on the label size kept clear of the right and top edges.
    pub edge_margin: f32,
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: 400,
            exhaustion: ExhaustionPolicy::BestEffort,
            order: RenderOrder::Descending,
            edge_margin: 1.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub window: MagnitudeWindow,
    pub scale_factor: f32,
    pub base_significance: f32,
    pub distance_range: f32,
    /// Ratio between the viewport and the canvas; significance is computed
    /// against the viewport height.
    pub viewport_scale: f32,
    pub columns: CatalogColumns,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            window: MagnitudeWindow::default(),
            scale_factor: 0.8,
            base_significance: 8.0,
            distance_range: DEFAULT_DISTANCE_RANGE,
            viewport_scale: 1.25,
            columns: CatalogColumns::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub show_hud: bool,
    pub show_panel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#000000".to_string(),
            show_hud: true,
            show_panel: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub catalog: CatalogConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::night_sky();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            catalog: CatalogConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    star_outline: Option<String>,
    star_outline_width: Option<f32>,
    background_word_fill: Option<String>,
    background_word_opacity: Option<f32>,
    background_word_size: Option<f32>,
    hud_color: Option<String>,
    hud_font_size: Option<f32>,
    panel_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOverrides {
    max_attempts: Option<usize>,
    exhaustion: Option<ExhaustionPolicy>,
    order: Option<RenderOrder>,
    edge_margin: Option<f32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogOverrides {
    faintest_magnitude: Option<f32>,
    brightest_magnitude: Option<f32>,
    scale_factor: Option<f32>,
    base_significance: Option<f32>,
    distance_range: Option<f32>,
    viewport_scale: Option<f32>,
    columns: Option<CatalogColumns>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutOverrides>,
    catalog: Option<CatalogOverrides>,
    width: Option<f32>,
    height: Option<f32>,
    show_hud: Option<bool>,
    show_panel: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(&contents).map_err(|json5_err| {
            anyhow::anyhow!(
                "invalid config {}: {json_err} (as JSON5: {json5_err})",
                path.display()
            )
        })?,
    };
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "paper" || theme_name == "light" {
            config.theme = Theme::paper();
        } else if theme_name == "night" || theme_name == "default" {
            config.theme = Theme::night_sky();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.star_outline {
            config.theme.star_outline = v;
        }
        if let Some(v) = vars.star_outline_width {
            config.theme.star_outline_width = v;
        }
        if let Some(v) = vars.background_word_fill {
            config.theme.background_word_fill = v;
        }
        if let Some(v) = vars.background_word_opacity {
            config.theme.background_word_opacity = v;
        }
        if let Some(v) = vars.background_word_size {
            config.theme.background_word_size = v;
        }
        if let Some(v) = vars.hud_color {
            config.theme.hud_color = v;
        }
        if let Some(v) = vars.hud_font_size {
            config.theme.hud_font_size = v;
        }
        if let Some(v) = vars.panel_color {
            config.theme.panel_color = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.max_attempts {
            config.layout.max_attempts = v.max(1);
        }
        if let Some(v) = layout.exhaustion {
            config.layout.exhaustion = v;
        }
        if let Some(v) = layout.order {
            config.layout.order = v;
        }
        if let Some(v) = layout.edge_margin {
            config.layout.edge_margin = v;
        }
        if layout.seed.is_some() {
            config.layout.seed = layout.seed;
        }
    }

    if let Some(catalog) = parsed.catalog {
        if let Some(v) = catalog.faintest_magnitude {
            config.catalog.window.faintest = v;
        }
        if let Some(v) = catalog.brightest_magnitude {
            config.catalog.window.brightest = v;
        }
        if let Some(v) = catalog.scale_factor {
            config.catalog.scale_factor = v;
        }
        if let Some(v) = catalog.base_significance {
            config.catalog.base_significance = v;
        }
        if let Some(v) = catalog.distance_range {
            config.catalog.distance_range = v;
        }
        if let Some(v) = catalog.viewport_scale {
            config.catalog.viewport_scale = v;
        }
        if let Some(v) = catalog.columns {
            config.catalog.columns = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if let Some(v) = parsed.show_hud {
        config.render.show_hud = v;
    }
    if let Some(v) = parsed.show_panel {
        config.render.show_panel = v;
    }
}
