use serde::{Deserialize, Serialize};
use std::fmt;

/// Readiness area each question measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DigitalAssetOrganization,
    SecurityAndAccess,
    LegalReadiness,
    FamilyCommunication,
    EmergencyPreparedness,
    EmotionalLegacy,
}

impl Category {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::DigitalAssetOrganization,
            Self::SecurityAndAccess,
            Self::LegalReadiness,
            Self::FamilyCommunication,
            Self::EmergencyPreparedness,
            Self::EmotionalLegacy,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DigitalAssetOrganization => "Digital Asset Organization",
            Self::SecurityAndAccess => "Security & Access",
            Self::LegalReadiness => "Legal Readiness",
            Self::FamilyCommunication => "Family Communication",
            Self::EmergencyPreparedness => "Emergency Preparedness",
            Self::EmotionalLegacy => "Emotional Legacy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable answer. Options within a question are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub label: &'static str,
    pub points: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub category: Category,
    pub prompt: &'static str,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    pub fn max_points(&self) -> u16 {
        self.options
            .iter()
            .map(|option| option.points)
            .max()
            .unwrap_or(0)
    }
}

/// Why a selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFault {
    UnknownQuestion,
    OptionOutOfRange { available: usize },
}

impl fmt::Display for SelectionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionFault::UnknownQuestion => f.write_str("question does not exist"),
            SelectionFault::OptionOutOfRange { available } => {
                write!(f, "option index out of range (question has {available} options)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid selection {option_index} for question '{question_id}': {reason}")]
    InvalidSelection {
        question_id: String,
        option_index: usize,
        reason: SelectionFault,
    },
    #[error("assessment incomplete; unanswered questions: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
    #[error("assessment already complete; restart to answer again")]
    AlreadyComplete,
}
