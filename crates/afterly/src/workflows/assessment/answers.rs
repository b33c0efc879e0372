use std::collections::BTreeMap;

use serde::Serialize;

/// The option picked for one question together with the points it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub option_index: usize,
    pub points: u16,
}

/// Answers recorded so far, at most one per question.
///
/// Only [`AssessmentCatalog::record_answer`](super::AssessmentCatalog::record_answer)
/// inserts, so every entry refers to a real question and option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    selections: BTreeMap<&'static str, Selection>,
}

impl AnswerSet {
    pub(crate) fn insert(&mut self, question_id: &'static str, selection: Selection) {
        self.selections.insert(question_id, selection);
    }

    pub fn get(&self, question_id: &str) -> Option<Selection> {
        self.selections.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Selection)> + '_ {
        self.selections.iter().map(|(id, selection)| (*id, *selection))
    }

    pub(crate) fn total_points(&self) -> u16 {
        self.selections.values().map(|selection| selection.points).sum()
    }
}
