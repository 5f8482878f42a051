use crate::config::{Config, RenderConfig};
use crate::hover::{NO_SELECTION, Selection};
use crate::layout::{Layout, PlacedLabel, PlacementOutcome};
use crate::session::Session;
use crate::spectral::star_fill;
use crate::syllables::pronunciation;
use crate::theme::Theme;
use anyhow::Result;
use log::debug;
use std::path::Path;

/// Draws the current frame of a session: the retained scene plus whatever
/// is selected right now.
pub fn render_session_svg(session: &Session) -> String {
    let config = session.config();
    match session.measurer().family() {
        Some(family) => {
            let mut theme = config.theme.clone();
            theme.font_family = format!("\"{family}\", {}", config.theme.font_family);
            render_svg(session.layout(), session.selection(), &theme, config)
        }
        None => render_svg(session.layout(), session.selection(), &config.theme, config),
    }
}

pub fn render_svg(layout: &Layout, selection: &Selection, theme: &Theme, config: &Config) -> String {
    let mut svg = String::new();
    let width = layout.canvas.width.max(1.0);
    let height = layout.canvas.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.render.background
    ));

    if !layout.background.is_empty() {
        svg.push_str(&format!(
            "<g class=\"background-words\" font-family=\"{}\" fill=\"{}\" fill-opacity=\"{:.3}\">",
            escape_xml(&theme.font_family),
            theme.background_word_fill,
            theme.background_word_opacity
        ));
        for word in &layout.background {
            svg.push_str(&text_svg(word, None));
        }
        svg.push_str("</g>");
    }

    svg.push_str(&format!(
        "<g class=\"stars\" font-family=\"{}\" stroke=\"{}\" stroke-width=\"{}\" paint-order=\"stroke\">",
        escape_xml(&theme.font_family),
        theme.star_outline,
        theme.star_outline_width
    ));
    let mut hidden = 0usize;
    for star in &layout.stars {
        let Some(info) = star.label.star() else {
            continue;
        };
        if !layout.canvas.contains(star.anchor) {
            hidden += 1;
            continue;
        }
        let fill = star_fill(&info.spectra, info.magnitude).to_hex();
        svg.push_str(&text_svg(star, Some(&fill)));
    }
    svg.push_str("</g>");
    if hidden > 0 {
        debug!("{hidden} star labels anchored off canvas were not drawn");
    }

    if config.render.show_hud {
        svg.push_str(&hud_svg(layout, theme, config));
    }
    if config.render.show_panel {
        svg.push_str(&panel_svg(selection, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn text_svg(placed: &PlacedLabel, fill: Option<&str>) -> String {
    let mut attrs = format!(
        "x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.2}\"",
        placed.anchor.x, placed.anchor.y, placed.label.visual_weight
    );
    if let Some(fill) = fill {
        attrs.push_str(&format!(" fill=\"{fill}\""));
    }
    if let Some(id) = placed.label.id() {
        attrs.push_str(&format!(" data-id=\"{id}\""));
    }
    if placed.outcome == PlacementOutcome::Overlapping {
        attrs.push_str(" class=\"overlapping\"");
    }
    format!("<text {attrs}>{}</text>", escape_xml(&placed.label.text))
}

fn hud_svg(layout: &Layout, theme: &Theme, config: &Config) -> String {
    let x = layout.canvas.width - 100.0;
    let lines = [
        (
            layout.canvas.height - 5.0,
            format!("Minimum Mag: {}", config.catalog.window.faintest),
        ),
        (
            layout.canvas.height - 15.0,
            format!("Scale Factor: {}", config.catalog.scale_factor),
        ),
    ];
    let mut out = format!(
        "<g class=\"hud\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        theme.hud_font_size,
        theme.hud_color
    );
    for (y, text) in lines {
        out.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\">{}</text>",
            escape_xml(&text)
        ));
    }
    out.push_str("</g>");
    out
}

fn panel_svg(selection: &Selection, theme: &Theme) -> String {
    let font_size = theme.hud_font_size + 2.0;
    let id = selection
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| NO_SELECTION.to_string());
    let spoken = selection
        .text()
        .map(pronunciation)
        .filter(|spoken| !spoken.is_empty())
        .unwrap_or_else(|| NO_SELECTION.to_string());
    let lines = [
        format!("ID: {id}"),
        format!("Name: {selection}"),
        format!("Pronunciation: {spoken}"),
    ];
    let mut out = format!(
        "<g class=\"selection\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        theme.panel_color
    );
    for (idx, line) in lines.iter().enumerate() {
        let y = 10.0 + font_size * (idx as f32 + 1.0) * 1.2;
        out.push_str(&format!(
            "<text x=\"10.00\" y=\"{y:.2}\">{}</text>",
            escape_xml(line)
        ));
    }
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes `svg`. When labels were measured with a font file, pass it as
/// `font_file` so the drawn glyphs match the measured boxes.
#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
    font_file: Option<&Path>,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
        .unwrap_or("sans-serif")
        .to_string();
    opt.fontdb_mut().load_system_fonts();
    if let Some(path) = font_file {
        opt.fontdb_mut()
            .load_font_file(path)
            .map_err(|err| anyhow::anyhow!("failed to load font {}: {err}", path.display()))?;
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
    _font_file: Option<&Path>,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;
    use crate::config::CatalogConfig;
    use crate::layout::{Canvas, compute_layout};
    use crate::text_metrics::FallbackMeasurer;

    fn scene(config: &Config) -> Layout {
        let records = vec![
            CatalogRecord {
                id: 11767,
                name: "Polaris".to_string(),
                apparent_magnitude: 1.97,
                distance: 132.6,
                distance_mapped: 1.3,
                spectra: "F7:Ib-IIv SB".to_string(),
                significance: 18.0,
            },
            CatalogRecord {
                id: 9,
                name: "R&D <7>".to_string(),
                apparent_magnitude: 5.0,
                distance: 50.0,
                distance_mapped: 0.5,
                spectra: "Q".to_string(),
                significance: 12.0,
            },
        ];
        compute_layout(
            &records,
            &["nebula".to_string()],
            &FallbackMeasurer,
            &CatalogConfig::default(),
            &config.layout,
            config.theme.background_word_size,
            Canvas::new(config.render.width, config.render.height),
        )
    }

    #[test]
    fn render_svg_basic() {
        let mut config = Config::default();
        config.layout.seed = Some(3);
        let layout = scene(&config);
        let svg = render_svg(&layout, &Selection::Nothing, &config.theme, &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Polaris</text>"));
        assert!(svg.contains("data-id=\"11767\""));
        assert!(svg.contains("R&amp;D &lt;7&gt;"));
        assert!(svg.contains(">nebula</text>"));
        assert!(svg.contains("Minimum Mag: 12"));
        assert!(svg.contains("Scale Factor: 0.8"));
        assert!(svg.contains("Name: N/A"));
        assert!(svg.contains("Pronunciation: N/A"));
        // Unknown class letter draws in grayscale.
        assert!(svg.contains("fill=\"#FAFAFA\""));
    }

    #[test]
    fn panel_shows_selection() {
        let mut config = Config::default();
        config.layout.seed = Some(4);
        config.render.show_hud = false;
        let layout = scene(&config);
        let selection = Selection::Label {
            id: Some(11767),
            text: "Polaris".into(),
        };
        let svg = render_svg(&layout, &selection, &config.theme, &config);
        assert!(svg.contains("ID: 11767"));
        assert!(svg.contains("Name: Polaris"));
        let spoken = pronunciation("Polaris");
        assert_eq!(spoken.replace('-', ""), "polaris");
        assert!(svg.contains(&format!("Pronunciation: {spoken}")));
        assert!(!svg.contains("Minimum Mag"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_output_loads_the_measuring_font() {
        let config = Config::default();
        let output = std::env::temp_dir().join("starword-font-check.png");
        let err = write_output_png(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>",
            &output,
            &config.render,
            &config.theme,
            Some(Path::new("/nonexistent/Roboto-Medium.ttf")),
        )
        .expect_err("missing font file must fail");
        assert!(err.to_string().contains("Roboto-Medium.ttf"));
    }
}
