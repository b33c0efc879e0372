use serde::Serialize;

use super::answers::{AnswerSet, Selection};
use super::catalog::AssessmentCatalog;
use super::domain::{AssessmentError, Question};
use super::outcome::AssessmentOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    InProgress { question_index: usize },
    Completed,
}

/// Where the respondent is in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub question_number: usize,
    pub total: usize,
    pub answered: usize,
    pub percent_complete: u8,
}

/// Linear wizard over the catalog.
///
/// Each valid answer advances to the next unanswered question in list order;
/// once nothing is left unanswered the session is complete. Invalid
/// selections leave the session untouched.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    catalog: &'static AssessmentCatalog,
    answers: AnswerSet,
    phase: SessionPhase,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new(AssessmentCatalog::standard())
    }
}

impl AssessmentSession {
    pub fn new(catalog: &'static AssessmentCatalog) -> Self {
        Self {
            catalog,
            answers: AnswerSet::default(),
            phase: SessionPhase::InProgress { question_index: 0 },
        }
    }

    pub fn catalog(&self) -> &'static AssessmentCatalog {
        self.catalog
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.catalog.is_complete(&self.answers)
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.phase {
            SessionPhase::InProgress { question_index } => {
                self.catalog.questions().get(question_index)
            }
            SessionPhase::Completed => None,
        }
    }

    /// Answer the question currently on screen.
    pub fn answer(&mut self, option_index: usize) -> Result<Selection, AssessmentError> {
        let question = self
            .current_question()
            .ok_or(AssessmentError::AlreadyComplete)?;
        self.answer_question(question.id, option_index)
    }

    /// Answer (or revise) any question by id, then advance.
    pub fn answer_question(
        &mut self,
        question_id: &str,
        option_index: usize,
    ) -> Result<Selection, AssessmentError> {
        let selection = self
            .catalog
            .record_answer(&mut self.answers, question_id, option_index)?;
        self.advance();
        Ok(selection)
    }

    pub fn progress(&self) -> SessionProgress {
        let total = self.catalog.len();
        let question_number = match self.phase {
            SessionPhase::InProgress { question_index } => question_index + 1,
            SessionPhase::Completed => total,
        };
        let percent_complete = if total == 0 {
            100
        } else {
            ((question_number as f64 / total as f64) * 100.0).round() as u8
        };

        SessionProgress {
            question_number,
            total,
            answered: self.answers.len(),
            percent_complete,
        }
    }

    /// Score and tier, available once every question is answered.
    pub fn outcome(&self) -> Result<AssessmentOutcome, AssessmentError> {
        AssessmentOutcome::evaluate(self.catalog, &self.answers)
    }

    /// Discard all answers and return to the first question.
    pub fn restart(&mut self) {
        self.answers.clear();
        self.phase = SessionPhase::InProgress { question_index: 0 };
    }

    fn advance(&mut self) {
        let next = self
            .catalog
            .questions()
            .iter()
            .position(|question| self.answers.get(question.id).is_none());

        self.phase = match next {
            Some(question_index) => SessionPhase::InProgress { question_index },
            None => SessionPhase::Completed,
        };
    }
}
