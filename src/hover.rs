use crate::layout::{Canvas, PlacedLabel, Point};
use serde::Serialize;
use std::fmt;

pub const WIKIPEDIA_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Shown wherever a selection is displayed and nothing is under the cursor.
pub const NO_SELECTION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Selection {
    #[default]
    Nothing,
    Label { id: Option<u64>, text: String },
}

impl Selection {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Selection::Nothing)
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Selection::Label { id, .. } => *id,
            Selection::Nothing => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Selection::Label { text, .. } => Some(text),
            Selection::Nothing => None,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().unwrap_or(NO_SELECTION))
    }
}

/// Label under `cursor`. Labels are scanned in order and a later match
/// replaces an earlier one, so the last label containing the point wins.
pub fn hit_test(cursor: Point, labels: &[PlacedLabel]) -> Selection {
    let mut selection = Selection::Nothing;
    for placed in labels {
        if placed.bounds.contains(cursor) {
            selection = Selection::Label {
                id: placed.label.id(),
                text: placed.label.text.clone(),
            };
        }
    }
    selection
}

/// Reference page to open for a click at `cursor`, if the click lands on
/// the canvas while a named label is selected.
pub fn click_target(cursor: Point, canvas: Canvas, selection: &Selection) -> Option<String> {
    if !canvas.contains(cursor) {
        return None;
    }
    let text = selection.text()?.trim();
    if text.is_empty() || text == NO_SELECTION {
        return None;
    }
    Some(format!("{WIKIPEDIA_BASE}{}", text.replace(' ', "_")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Label, LabelBox, LabelKind, PlacementOutcome, StarInfo};

    fn placed(id: u64, text: &str, bounds: LabelBox) -> PlacedLabel {
        PlacedLabel {
            label: Label {
                text: text.to_string(),
                visual_weight: 12.0,
                kind: LabelKind::Star(StarInfo {
                    id,
                    magnitude: 1.0,
                    spectra: "G2V".to_string(),
                    distance: 1.0,
                }),
            },
            anchor: Point::new(bounds.left, bounds.top),
            bounds,
            outcome: PlacementOutcome::Clear,
        }
    }

    #[test]
    fn hit_test_uses_inclusive_box() {
        let labels = vec![placed(1, "Deneb", LabelBox::new(10.0, 50.0, 40.0, 20.0))];
        assert_eq!(
            hit_test(Point::new(20.0, 30.0), &labels),
            Selection::Label {
                id: Some(1),
                text: "Deneb".into()
            }
        );
        assert_eq!(hit_test(Point::new(5.0, 30.0), &labels), Selection::Nothing);
        assert_eq!(hit_test(Point::new(41.0, 30.0), &labels), Selection::Nothing);
    }

    #[test]
    fn last_match_wins() {
        let labels = vec![
            placed(1, "A", LabelBox::new(0.0, 50.0, 50.0, 0.0)),
            placed(2, "B", LabelBox::new(25.0, 75.0, 75.0, 25.0)),
        ];
        assert_eq!(hit_test(Point::new(30.0, 30.0), &labels).id(), Some(2));
        assert_eq!(hit_test(Point::new(10.0, 10.0), &labels).id(), Some(1));
    }

    #[test]
    fn hit_test_is_idempotent() {
        let labels = vec![placed(1, "Mira", LabelBox::new(0.0, 20.0, 40.0, 0.0))];
        let cursor = Point::new(10.0, 10.0);
        let first = hit_test(cursor, &labels);
        for _ in 0..10 {
            assert_eq!(hit_test(cursor, &labels), first);
        }
    }

    #[test]
    fn nothing_displays_placeholder() {
        assert_eq!(Selection::Nothing.to_string(), "N/A");
        assert!(Selection::Nothing.is_nothing());
    }

    #[test]
    fn click_requires_canvas_and_named_selection() {
        let canvas = Canvas::new(100.0, 100.0);
        let selection = Selection::Label {
            id: Some(3),
            text: "Alpha Centauri".into(),
        };
        assert_eq!(
            click_target(Point::new(50.0, 50.0), canvas, &selection).as_deref(),
            Some("https://en.wikipedia.org/wiki/Alpha_Centauri")
        );
        assert_eq!(click_target(Point::new(150.0, 50.0), canvas, &selection), None);
        assert_eq!(click_target(Point::new(-1.0, 50.0), canvas, &selection), None);
        assert_eq!(click_target(Point::new(50.0, 50.0), canvas, &Selection::Nothing), None);
    }
}
