use crate::hover::Selection;
use crate::layout::{Layout, LayoutStats, PlacementOutcome};
use crate::spectral::star_fill;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub stats: LayoutStats,
    pub stars: Vec<StarDump>,
    pub words: Vec<WordDump>,
    pub selection: Selection,
}

#[derive(Debug, Serialize)]
pub struct StarDump {
    pub id: u64,
    pub text: String,
    pub magnitude: f32,
    pub spectra: String,
    pub fill: String,
    pub weight: f32,
    pub x: f32,
    pub y: f32,
    /// `[left, top, right, bottom]`, top below bottom in screen space.
    pub bounds: [f32; 4],
    pub outcome: PlacementOutcome,
}

#[derive(Debug, Serialize)]
pub struct WordDump {
    pub text: String,
    pub weight: f32,
    pub x: f32,
    pub y: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, selection: &Selection) -> Self {
        let stars = layout
            .stars
            .iter()
            .filter_map(|placed| {
                let star = placed.label.star()?;
                Some(StarDump {
                    id: star.id,
                    text: placed.label.text.clone(),
                    magnitude: star.magnitude,
                    spectra: star.spectra.clone(),
                    fill: star_fill(&star.spectra, star.magnitude).to_hex(),
                    weight: placed.label.visual_weight,
                    x: placed.anchor.x,
                    y: placed.anchor.y,
                    bounds: [
                        placed.bounds.left,
                        placed.bounds.top,
                        placed.bounds.right,
                        placed.bounds.bottom,
                    ],
                    outcome: placed.outcome,
                })
            })
            .collect();

        let words = layout
            .background
            .iter()
            .map(|placed| WordDump {
                text: placed.label.text.clone(),
                weight: placed.label.visual_weight,
                x: placed.anchor.x,
                y: placed.anchor.y,
            })
            .collect();

        LayoutDump {
            seed: layout.seed,
            width: layout.canvas.width,
            height: layout.canvas.height,
            stats: layout.stats,
            stars,
            words,
            selection: selection.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_layout_dump(path: Option<&Path>, layout: &Layout, selection: &Selection) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, selection);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => println!("{}", dump.to_json()?),
    }
    Ok(())
}
