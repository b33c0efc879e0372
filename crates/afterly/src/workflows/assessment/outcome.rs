use serde::Serialize;

use super::answers::AnswerSet;
use super::catalog::AssessmentCatalog;
use super::domain::{AssessmentError, Category};
use super::tiers::{classify, TierProfile};

/// Points earned against points available within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub label: &'static str,
    pub earned: u16,
    pub available: u16,
}

/// Scored and classified result of a completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentOutcome {
    pub score: u16,
    pub max_score: u16,
    #[serde(flatten)]
    pub profile: TierProfile,
    pub categories: Vec<CategoryScore>,
}

impl AssessmentOutcome {
    pub fn evaluate(
        catalog: &AssessmentCatalog,
        answers: &AnswerSet,
    ) -> Result<Self, AssessmentError> {
        let score = catalog.compute_score(answers)?;

        let categories = Category::ordered()
            .into_iter()
            .filter_map(|category| {
                let questions = catalog.questions_in(category);
                if questions.is_empty() {
                    return None;
                }
                let earned: u16 = questions
                    .iter()
                    .filter_map(|question| answers.get(question.id))
                    .map(|selection| selection.points)
                    .sum();
                let available: u16 = questions.iter().map(|question| question.max_points()).sum();
                Some(CategoryScore {
                    category,
                    label: category.label(),
                    earned,
                    available,
                })
            })
            .collect();

        Ok(Self {
            score,
            max_score: catalog.max_score(),
            profile: *classify(score),
            categories,
        })
    }

    /// Categories with points left on the table, largest gap first.
    pub fn gaps(&self) -> Vec<&CategoryScore> {
        let mut gaps: Vec<&CategoryScore> = self
            .categories
            .iter()
            .filter(|entry| entry.earned < entry.available)
            .collect();
        gaps.sort_by_key(|entry| std::cmp::Reverse(entry.available - entry.earned));
        gaps
    }
}
