//! Equipment-readiness checklist session.
//!
//! State is ephemeral and scoped to one session: every item starts
//! unchecked, ticks live only in memory, and nothing is ever persisted.
//! Unknown categories or out-of-range indices are silent no-ops, matching
//! the leniency of the rest of the UI layer.

use crate::store::ChecklistCategory;

/// In-memory tick state over a checklist catalogue.
#[derive(Clone, Debug)]
pub struct ChecklistSession {
    categories: Vec<ChecklistCategory>,
    checked: Vec<Vec<bool>>,
}

impl ChecklistSession {
    /// Start a fresh session over the given catalogue, all items unchecked.
    pub fn new(catalogue: Vec<ChecklistCategory>) -> Self {
        let checked = catalogue
            .iter()
            .map(|category| vec![false; category.items.len()])
            .collect();
        Self {
            categories: catalogue,
            checked,
        }
    }

    pub fn categories(&self) -> &[ChecklistCategory] {
        &self.categories
    }

    /// Tick or untick one item. Unknown category or index does nothing.
    pub fn set(&mut self, category: &str, index: usize, value: bool) {
        let Some(pos) = self.categories.iter().position(|c| c.name == category) else {
            return;
        };
        if let Some(slot) = self.checked[pos].get_mut(index) {
            *slot = value;
        }
    }

    pub fn is_checked(&self, category: &str, index: usize) -> bool {
        self.categories
            .iter()
            .position(|c| c.name == category)
            .and_then(|pos| self.checked[pos].get(index))
            .copied()
            .unwrap_or(false)
    }

    /// `(done, total)` for one category; `None` for an unknown category.
    pub fn progress(&self, category: &str) -> Option<(usize, usize)> {
        let pos = self.categories.iter().position(|c| c.name == category)?;
        let done = self.checked[pos].iter().filter(|checked| **checked).count();
        Some((done, self.checked[pos].len()))
    }

    /// `(done, total)` over every category.
    pub fn overall(&self) -> (usize, usize) {
        let done = self
            .checked
            .iter()
            .flatten()
            .filter(|checked| **checked)
            .count();
        let total = self.checked.iter().map(Vec::len).sum();
        (done, total)
    }

    /// Untick everything, as at session start.
    pub fn reset(&mut self) {
        for row in &mut self.checked {
            row.fill(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<ChecklistCategory> {
        vec![
            ChecklistCategory {
                name: "Oxygénothérapie".into(),
                items: vec!["Bouteille O2".into(), "Détendeur".into()],
            },
            ChecklistCategory {
                name: "Immobilisation".into(),
                items: vec!["Attelles".into()],
            },
        ]
    }

    #[test]
    fn starts_unchecked_and_counts_progress() {
        let mut session = ChecklistSession::new(catalogue());
        assert_eq!(session.overall(), (0, 3));

        session.set("Oxygénothérapie", 0, true);
        session.set("Immobilisation", 0, true);
        assert_eq!(session.progress("Oxygénothérapie"), Some((1, 2)));
        assert_eq!(session.progress("Immobilisation"), Some((1, 1)));
        assert_eq!(session.overall(), (2, 3));
        assert!(session.is_checked("Immobilisation", 0));
    }

    #[test]
    fn unknown_category_or_index_is_a_no_op() {
        let mut session = ChecklistSession::new(catalogue());
        session.set("Pharmacie", 0, true);
        session.set("Immobilisation", 9, true);
        assert_eq!(session.overall(), (0, 3));
        assert_eq!(session.progress("Pharmacie"), None);
        assert!(!session.is_checked("Pharmacie", 0));
    }

    #[test]
    fn reset_clears_every_tick() {
        let mut session = ChecklistSession::new(catalogue());
        session.set("Oxygénothérapie", 0, true);
        session.set("Oxygénothérapie", 1, true);
        session.reset();
        assert_eq!(session.overall(), (0, 3));
    }
}
