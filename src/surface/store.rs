use crate::id_generator;

use super::{Visual, VisualId};

/// Visuals in attach order. Later entries paint on top.
#[derive(Debug, Default, Clone)]
pub struct VisualStore {
    entries: Vec<(VisualId, Visual)>,
}

impl VisualStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, visual: Visual) -> VisualId {
        let id = id_generator::generate_visual_id();
        self.entries.push((id, visual));
        id
    }

    pub fn remove(&mut self, id: VisualId) -> Option<Visual> {
        let pos = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, visual)| visual)
    }

    pub fn get_mut(&mut self, id: VisualId) -> Option<&mut Visual> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, visual)| visual)
    }

    /// Bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (VisualId, &Visual)> {
        self.entries.iter().map(|(id, visual)| (*id, visual))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
