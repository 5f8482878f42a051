// Randomized label placement against the registry of already placed boxes.

use super::geometry::{LabelBox, Point};
use super::registry::{LabelKey, Registry};
use super::Canvas;
use crate::config::LayoutConfig;
use crate::text_metrics::TextSize;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What to do with a label once `max_attempts` candidates all collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustionPolicy {
    /// Keep the candidate with the least overlap and flag it.
    BestEffort,
    /// Leave the label out of the scene.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementOutcome {
    Clear,
    Overlapping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub anchor: Point,
    pub bounds: LabelBox,
    pub attempts: usize,
    pub outcome: PlacementOutcome,
}

/// Finds a spot for a label of `size` and registers it under `key`.
///
/// Anchors are drawn uniformly from `[0, W - m*w] x [m*h, H]` where `m` is
/// the configured edge margin. Returns `None` only when every attempt
/// collided and the policy is [`ExhaustionPolicy::Skip`].
pub fn place<R: Rng + ?Sized>(
    key: LabelKey,
    size: TextSize,
    canvas: Canvas,
    registry: &mut Registry,
    rng: &mut R,
    config: &LayoutConfig,
) -> Option<Placement> {
    let max_attempts = config.max_attempts.max(1);
    let mut best: Option<(Point, LabelBox, f32)> = None;

    for attempt in 1..=max_attempts {
        let anchor = sample_anchor(rng, size, canvas, config.edge_margin);
        let bounds = LabelBox::from_anchor(anchor, size);
        let overlap = registry.overlap_area(&bounds);
        if overlap <= 0.0 {
            registry.insert(key, bounds);
            return Some(Placement {
                anchor,
                bounds,
                attempts: attempt,
                outcome: PlacementOutcome::Clear,
            });
        }
        if best.is_none_or(|(_, _, least)| overlap < least) {
            best = Some((anchor, bounds, overlap));
        }
    }

    match config.exhaustion {
        ExhaustionPolicy::Skip => {
            warn!("no free spot for {key} after {max_attempts} attempts, skipping");
            None
        }
        ExhaustionPolicy::BestEffort => {
            let (anchor, bounds, overlap) = best?;
            warn!(
                "no free spot for {key} after {max_attempts} attempts, \
                 keeping candidate overlapping {overlap:.1}px²"
            );
            registry.insert(key, bounds);
            Some(Placement {
                anchor,
                bounds,
                attempts: max_attempts,
                outcome: PlacementOutcome::Overlapping,
            })
        }
    }
}

fn sample_anchor<R: Rng + ?Sized>(rng: &mut R, size: TextSize, canvas: Canvas, margin: f32) -> Point {
    let x_max = canvas.width - size.width * margin;
    let y_min = size.height * margin;
    if x_max < 0.0 || y_min > canvas.height {
        debug!(
            "label {:.1}x{:.1} does not fit a {:.0}x{:.0} canvas",
            size.width, size.height, canvas.width, canvas.height
        );
    }
    Point::new(
        sample_range(rng, 0.0, x_max),
        sample_range(rng, y_min, canvas.height),
    )
}

/// Uniform sample from `[lo, hi)`; an empty range collapses to `lo`.
fn sample_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::intersects;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn canvas() -> Canvas {
        Canvas::new(400.0, 300.0)
    }

    #[test]
    fn anchor_respects_edge_margins() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = LayoutConfig::default();
        let size = TextSize::new(60.0, 20.0);
        for idx in 0..200 {
            let mut registry = Registry::new();
            let placed = place(LabelKey::Id(idx), size, canvas(), &mut registry, &mut rng, &config)
                .expect("empty registry always places");
            assert!(placed.anchor.x >= 0.0 && placed.anchor.x <= 400.0 - 90.0);
            assert!(placed.anchor.y >= 30.0 && placed.anchor.y <= 300.0);
            assert_eq!(placed.attempts, 1);
        }
    }

    #[test]
    fn placement_registers_box_under_key() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut registry = Registry::new();
        let placed = place(
            LabelKey::Text("Vega".into()),
            TextSize::new(40.0, 12.0),
            canvas(),
            &mut registry,
            &mut rng,
            &LayoutConfig::default(),
        )
        .expect("placed");
        assert_eq!(registry.get(&LabelKey::Text("Vega".into())), Some(&placed.bounds));
        assert_eq!(placed.outcome, PlacementOutcome::Clear);
    }

    #[test]
    fn placement_avoids_registered_boxes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut registry = Registry::new();
        // Claim the left half of the canvas.
        let blocked = LabelBox::new(0.0, 300.0, 200.0, 0.0);
        registry.insert(LabelKey::Text("wall".into()), blocked);
        let config = LayoutConfig::default();
        for idx in 0..50 {
            let placed = place(
                LabelKey::Id(idx),
                TextSize::new(10.0, 10.0),
                canvas(),
                &mut registry,
                &mut rng,
                &config,
            )
            .expect("plenty of room on the right");
            assert!(!intersects(&placed.bounds, &blocked));
        }
    }

    #[test]
    fn skip_policy_drops_label_when_canvas_is_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut registry = Registry::new();
        registry.insert(LabelKey::Text("all".into()), LabelBox::new(-10.0, 400.0, 500.0, -10.0));
        let config = LayoutConfig {
            max_attempts: 25,
            exhaustion: ExhaustionPolicy::Skip,
            ..LayoutConfig::default()
        };
        let placed = place(
            LabelKey::Id(9),
            TextSize::new(10.0, 10.0),
            canvas(),
            &mut registry,
            &mut rng,
            &config,
        );
        assert!(placed.is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn best_effort_policy_keeps_flagged_label() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut registry = Registry::new();
        registry.insert(LabelKey::Text("all".into()), LabelBox::new(-10.0, 400.0, 500.0, -10.0));
        let config = LayoutConfig {
            max_attempts: 25,
            ..LayoutConfig::default()
        };
        let placed = place(
            LabelKey::Id(9),
            TextSize::new(10.0, 10.0),
            canvas(),
            &mut registry,
            &mut rng,
            &config,
        )
        .expect("best effort keeps the label");
        assert_eq!(placed.outcome, PlacementOutcome::Overlapping);
        assert_eq!(placed.attempts, 25);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn oversized_label_collapses_to_range_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut registry = Registry::new();
        let placed = place(
            LabelKey::Id(1),
            TextSize::new(1000.0, 20.0),
            canvas(),
            &mut registry,
            &mut rng,
            &LayoutConfig::default(),
        )
        .expect("placed");
        assert_eq!(placed.anchor.x, 0.0);
    }

    #[test]
    fn same_seed_gives_same_anchor() {
        let size = TextSize::new(30.0, 10.0);
        let config = LayoutConfig::default();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut registry = Registry::new();
            place(LabelKey::Id(1), size, canvas(), &mut registry, &mut rng, &config)
                .map(|placed| placed.anchor)
        };
        assert_eq!(run(11), run(11));
    }
}
