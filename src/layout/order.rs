use serde::{Deserialize, Serialize};

/// Sequence in which labels are offered to the placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderOrder {
    /// Heaviest first, so large labels claim space before the canvas fills up.
    #[default]
    Descending,
    Ascending,
    AsGiven,
}

impl RenderOrder {
    pub fn apply<T>(self, items: &mut [T], weight: impl Fn(&T) -> f32) {
        match self {
            RenderOrder::Descending => items.sort_unstable_by(|a, b| weight(b).total_cmp(&weight(a))),
            RenderOrder::Ascending => items.sort_unstable_by(|a, b| weight(a).total_cmp(&weight(b))),
            RenderOrder::AsGiven => {}
        }
    }
}
