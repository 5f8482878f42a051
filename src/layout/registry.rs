use super::geometry::{LabelBox, Point, intersects, overlap_area};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identity under which a placed box is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum LabelKey {
    Id(u64),
    Text(String),
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelKey::Id(id) => write!(f, "#{id}"),
            LabelKey::Text(text) => f.write_str(text),
        }
    }
}

/// Boxes claimed during one layout pass, in insertion order.
///
/// Re-inserting a key replaces its box in place (last write wins).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<(LabelKey, LabelBox)>,
    index: HashMap<LabelKey, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LabelKey, bounds: LabelBox) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1 = bounds;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, bounds));
    }

    pub fn get(&self, key: &LabelKey) -> Option<&LabelBox> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Key of the last registered box containing `point`.
    pub fn query(&self, point: Point) -> Option<&LabelKey> {
        self.entries
            .iter()
            .filter(|(_, bounds)| bounds.contains(point))
            .map(|(key, _)| key)
            .last()
    }

    pub fn intersects_any(&self, candidate: &LabelBox) -> bool {
        self.entries
            .iter()
            .any(|(_, bounds)| intersects(bounds, candidate))
    }

    /// Total interior area `candidate` shares with registered boxes.
    pub fn overlap_area(&self, candidate: &LabelBox) -> f32 {
        self.entries
            .iter()
            .map(|(_, bounds)| overlap_area(bounds, candidate))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabelKey, &LabelBox)> {
        self.entries.iter().map(|(key, bounds)| (key, bounds))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_existing_key_in_place() {
        let mut registry = Registry::new();
        registry.insert(LabelKey::Id(1), LabelBox::new(0.0, 10.0, 10.0, 0.0));
        registry.insert(LabelKey::Id(2), LabelBox::new(20.0, 10.0, 30.0, 0.0));
        registry.insert(LabelKey::Id(1), LabelBox::new(50.0, 10.0, 60.0, 0.0));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(&LabelKey::Id(1)),
            Some(&LabelBox::new(50.0, 10.0, 60.0, 0.0))
        );
        let keys: Vec<_> = registry.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(keys, vec![LabelKey::Id(1), LabelKey::Id(2)]);
    }

    #[test]
    fn query_returns_last_containing_entry() {
        let mut registry = Registry::new();
        registry.insert(LabelKey::Text("a".into()), LabelBox::new(0.0, 20.0, 20.0, 0.0));
        registry.insert(LabelKey::Text("b".into()), LabelBox::new(10.0, 30.0, 30.0, 10.0));

        assert_eq!(
            registry.query(Point::new(15.0, 15.0)),
            Some(&LabelKey::Text("b".into()))
        );
        assert_eq!(
            registry.query(Point::new(5.0, 5.0)),
            Some(&LabelKey::Text("a".into()))
        );
        assert_eq!(registry.query(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn overlap_area_sums_all_entries() {
        let mut registry = Registry::new();
        registry.insert(LabelKey::Id(1), LabelBox::new(0.0, 10.0, 10.0, 0.0));
        registry.insert(LabelKey::Id(2), LabelBox::new(10.0, 10.0, 20.0, 0.0));
        let candidate = LabelBox::new(5.0, 10.0, 15.0, 5.0);
        assert!(registry.intersects_any(&candidate));
        assert_eq!(registry.overlap_area(&candidate), 50.0);
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = Registry::new();
        registry.insert(LabelKey::Id(1), LabelBox::new(0.0, 10.0, 10.0, 0.0));
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.get(&LabelKey::Id(1)), None);
    }
}
