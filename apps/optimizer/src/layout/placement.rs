//! Section Placement Model.
//!
//! Assigns every present section to exactly one logical page and an ordered
//! position on it. All operations are total: out-of-range input is a silent
//! no-op reported through the returned `bool` (or `None`), never a panic.

use serde::{Deserialize, Serialize};

use crate::models::{ResumeDocument, SectionKey};

/// Smallest page count a session may be configured with.
pub const MIN_PAGES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered logical pages, each an ordered list of distinct section keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementModel {
    pages: Vec<Vec<SectionKey>>,
}

impl PlacementModel {
    /// Canonical placement: every present section on page 0, other pages empty.
    pub fn initial(document: &ResumeDocument, page_count: usize) -> Self {
        let mut pages = vec![Vec::new(); page_count.max(MIN_PAGES)];
        pages[0] = document.present_sections();
        Self { pages }
    }

    pub fn pages(&self) -> &[Vec<SectionKey>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Discards any customization and rebuilds the canonical placement.
    pub fn reinitialize(&mut self, document: &ResumeDocument) {
        *self = Self::initial(document, self.pages.len());
    }

    /// Swaps the key at `(page, index)` with its neighbour.
    pub fn move_within_page(&mut self, page: usize, index: usize, direction: MoveDirection) -> bool {
        let Some(keys) = self.pages.get_mut(page) else {
            return false;
        };
        if index >= keys.len() {
            return false;
        }
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < keys.len() => index + 1,
            _ => return false,
        };
        keys.swap(index, target);
        true
    }

    /// Removes the key at `(from_page, from_index)` and appends it to `to_page`.
    pub fn move_to_page(&mut self, from_page: usize, from_index: usize, to_page: usize) -> bool {
        if from_page == to_page || to_page >= self.pages.len() {
            return false;
        }
        let Some(keys) = self.pages.get_mut(from_page) else {
            return false;
        };
        if from_index >= keys.len() {
            return false;
        }
        let key = keys.remove(from_index);
        self.pages[to_page].push(key);
        true
    }

    /// Removes the key at `(page, index)`. The section content is untouched.
    pub fn delete_section(&mut self, page: usize, index: usize) -> Option<SectionKey> {
        let keys = self.pages.get_mut(page)?;
        if index >= keys.len() {
            return None;
        }
        Some(keys.remove(index))
    }

    /// `(page, index)` of `key`, if placed.
    pub fn locate(&self, key: SectionKey) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(page, keys)| {
            keys.iter().position(|k| *k == key).map(|index| (page, index))
        })
    }

    pub fn contains(&self, key: SectionKey) -> bool {
        self.locate(key).is_some()
    }

    /// Keeps the placement a subset of the present sections after a content edit.
    ///
    /// Keys whose section became empty are pruned. Keys that became present
    /// (absent in `before`, present in `after`) are appended to page 0; a
    /// section the user deleted from the placement while it stayed present
    /// remains deleted.
    pub fn reconcile(&mut self, before: &ResumeDocument, after: &ResumeDocument) {
        for keys in &mut self.pages {
            keys.retain(|key| after.is_present(*key));
        }
        for key in SectionKey::CANONICAL {
            if !before.is_present(key) && after.is_present(key) && !self.contains(key) {
                self.pages[0].push(key);
            }
        }
    }

    /// True when every placed key is present in `document` and none repeats.
    pub fn is_consistent_with(&self, document: &ResumeDocument) -> bool {
        let mut seen = Vec::new();
        for key in self.pages.iter().flatten() {
            if seen.contains(key) || !document.is_present(*key) {
                return false;
            }
            seen.push(*key);
        }
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, Experience};

    fn make_document() -> ResumeDocument {
        ResumeDocument {
            summary: "Backend engineer".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience: vec![Experience {
                role: "Engineer".to_string(),
                company: "Acme".to_string(),
                dates: "2021 - 2024".to_string(),
                bullets: vec!["Shipped things".to_string()],
            }],
            education: vec![Education {
                institution: "MIT".to_string(),
                degree: "BSc".to_string(),
                dates: "2017 - 2021".to_string(),
            }],
            ..Default::default()
        }
    }

    fn key_sets(model: &PlacementModel) -> Vec<Vec<SectionKey>> {
        model
            .pages()
            .iter()
            .map(|keys| {
                let mut keys = keys.clone();
                keys.sort();
                keys
            })
            .collect()
    }

    // ── initial / reinitialize ──────────────────────────────────────────────

    #[test]
    fn test_initial_places_present_sections_on_first_page() {
        let model = PlacementModel::initial(&make_document(), 3);
        assert_eq!(model.page_count(), 3);
        assert_eq!(
            model.pages()[0],
            vec![
                SectionKey::Summary,
                SectionKey::Skills,
                SectionKey::Experience,
                SectionKey::Education
            ]
        );
        assert!(model.pages()[1].is_empty());
        assert!(model.pages()[2].is_empty());
        assert!(model.is_consistent_with(&make_document()));
    }

    #[test]
    fn test_page_count_is_at_least_two() {
        let model = PlacementModel::initial(&make_document(), 1);
        assert_eq!(model.page_count(), MIN_PAGES);
    }

    #[test]
    fn test_summary_only_document_places_only_summary() {
        let doc = ResumeDocument {
            summary: "Just a summary".to_string(),
            ..Default::default()
        };
        let model = PlacementModel::initial(&doc, 2);
        assert_eq!(model.pages()[0], vec![SectionKey::Summary]);
    }

    #[test]
    fn test_reinitialize_discards_customization() {
        let doc = make_document();
        let mut model = PlacementModel::initial(&doc, 2);
        model.move_to_page(0, 0, 1);
        model.delete_section(0, 0);
        model.reinitialize(&doc);
        assert_eq!(model, PlacementModel::initial(&doc, 2));
    }

    // ── move_within_page ────────────────────────────────────────────────────

    #[test]
    fn test_move_up_swaps_with_previous() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        assert!(model.move_within_page(0, 1, MoveDirection::Up));
        assert_eq!(model.pages()[0][0], SectionKey::Skills);
        assert_eq!(model.pages()[0][1], SectionKey::Summary);
    }

    #[test]
    fn test_move_at_boundaries_is_noop() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        let before = model.clone();
        assert!(!model.move_within_page(0, 0, MoveDirection::Up));
        assert!(!model.move_within_page(0, 3, MoveDirection::Down));
        assert_eq!(model, before);
    }

    #[test]
    fn test_move_out_of_range_is_noop() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        let before = model.clone();
        assert!(!model.move_within_page(7, 0, MoveDirection::Down));
        assert!(!model.move_within_page(0, 42, MoveDirection::Up));
        assert!(!model.move_within_page(1, 0, MoveDirection::Up));
        assert_eq!(model, before);
    }

    // ── move_to_page ────────────────────────────────────────────────────────

    #[test]
    fn test_move_to_page_appends_to_target() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        assert!(model.move_to_page(0, 2, 1));
        assert_eq!(model.pages()[1], vec![SectionKey::Experience]);
        assert!(!model.pages()[0].contains(&SectionKey::Experience));
        assert!(model.is_consistent_with(&make_document()));
    }

    #[test]
    fn test_move_to_page_and_back_preserves_key_sets() {
        let mut model = PlacementModel::initial(&make_document(), 3);
        let before = key_sets(&model);
        assert!(model.move_to_page(0, 1, 2));
        let (page, index) = model.locate(SectionKey::Skills).unwrap();
        assert_eq!(page, 2);
        assert!(model.move_to_page(page, index, 0));
        assert_eq!(key_sets(&model), before);
    }

    #[test]
    fn test_move_to_same_page_is_noop() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        let before = model.clone();
        assert!(!model.move_to_page(0, 0, 0));
        assert!(!model.move_to_page(0, 0, 9));
        assert!(!model.move_to_page(0, 9, 1));
        assert!(!model.move_to_page(5, 0, 1));
        assert_eq!(model, before);
    }

    // ── delete_section ──────────────────────────────────────────────────────

    #[test]
    fn test_delete_section_removes_key_only() {
        let mut model = PlacementModel::initial(&make_document(), 2);
        assert_eq!(model.delete_section(0, 1), Some(SectionKey::Skills));
        assert!(!model.contains(SectionKey::Skills));
        assert_eq!(model.delete_section(0, 10), None);
        assert_eq!(model.delete_section(4, 0), None);
    }

    // ── reconcile ───────────────────────────────────────────────────────────

    #[test]
    fn test_reconcile_prunes_emptied_sections() {
        let before = make_document();
        let mut after = before.clone();
        after.skills.clear();
        let mut model = PlacementModel::initial(&before, 2);
        model.reconcile(&before, &after);
        assert!(!model.contains(SectionKey::Skills));
        assert!(model.is_consistent_with(&after));
    }

    #[test]
    fn test_reconcile_appends_newly_present_sections() {
        let before = make_document();
        let mut after = before.clone();
        after.languages = vec!["English".to_string()];
        let mut model = PlacementModel::initial(&before, 2);
        model.move_to_page(0, 0, 1);
        model.reconcile(&before, &after);
        assert_eq!(model.pages()[0].last(), Some(&SectionKey::Languages));
        assert_eq!(model.pages()[1], vec![SectionKey::Summary]);
    }

    #[test]
    fn test_reconcile_keeps_user_deletions() {
        let before = make_document();
        let mut after = before.clone();
        after.skills.push("Go".to_string());
        let mut model = PlacementModel::initial(&before, 2);
        model.delete_section(0, 1);
        model.reconcile(&before, &after);
        assert!(!model.contains(SectionKey::Skills));
    }

    #[test]
    fn test_inconsistent_when_placed_section_is_absent() {
        let doc = make_document();
        let model = PlacementModel::initial(&doc, 2);
        let empty = ResumeDocument::default();
        assert!(!model.is_consistent_with(&empty));
    }

    #[test]
    fn test_direction_deserializes_lowercase() {
        let dir: MoveDirection = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(dir, MoveDirection::Down);
    }
}
