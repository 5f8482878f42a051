use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub star_outline: String,
    pub star_outline_width: f32,
    pub background_word_fill: String,
    pub background_word_opacity: f32,
    pub background_word_size: f32,
    pub hud_color: String,
    pub hud_font_size: f32,
    pub panel_color: String,
}

impl Theme {
    pub fn night_sky() -> Self {
        Self {
            font_family: "Roboto, \"Helvetica Neue\", Arial, sans-serif".to_string(),
            background: "#000000".to_string(),
            star_outline: "#000000".to_string(),
            star_outline_width: 1.0,
            background_word_fill: "#323232".to_string(),
            background_word_opacity: 50.0 / 255.0,
            background_word_size: 45.0,
            hud_color: "#808080".to_string(),
            hud_font_size: 10.0,
            panel_color: "#C8C8C8".to_string(),
        }
    }

    pub fn paper() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            star_outline: "#FFFFFF".to_string(),
            star_outline_width: 0.6,
            background_word_fill: "#7A8AA6".to_string(),
            background_word_opacity: 0.25,
            background_word_size: 45.0,
            hud_color: "#1C2430".to_string(),
            hud_font_size: 10.0,
            panel_color: "#1C2430".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::night_sky()
    }
}
