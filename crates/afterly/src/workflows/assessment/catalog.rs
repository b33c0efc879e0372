use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::answers::{AnswerSet, Selection};
use super::domain::{AnswerOption, AssessmentError, Category, Question, SelectionFault};

/// Immutable question set driving the readiness wizard.
#[derive(Debug)]
pub struct AssessmentCatalog {
    questions: Vec<Question>,
}

impl AssessmentCatalog {
    /// The LegacyScore question set, built once per process.
    pub fn standard() -> &'static Self {
        static CATALOG: OnceLock<AssessmentCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self {
            questions: standard_questions(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions_in(&self, category: Category) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .collect()
    }

    /// Best achievable total. The thresholds in `tiers` were written against a
    /// smaller scale, so this is surfaced rather than normalised away.
    pub fn max_score(&self) -> u16 {
        self.questions.iter().map(Question::max_points).sum()
    }

    /// Record (or replace) the selection for `question_id`.
    pub fn record_answer(
        &self,
        answers: &mut AnswerSet,
        question_id: &str,
        option_index: usize,
    ) -> Result<Selection, AssessmentError> {
        let question =
            self.question(question_id)
                .ok_or_else(|| AssessmentError::InvalidSelection {
                    question_id: question_id.to_string(),
                    option_index,
                    reason: SelectionFault::UnknownQuestion,
                })?;

        let option = question
            .option(option_index)
            .ok_or(AssessmentError::InvalidSelection {
                question_id: question_id.to_string(),
                option_index,
                reason: SelectionFault::OptionOutOfRange {
                    available: question.options.len(),
                },
            })?;

        let selection = Selection {
            option_index,
            points: option.points,
        };
        answers.insert(question.id, selection);
        Ok(selection)
    }

    /// Record a whole submission keyed by question id.
    pub fn answers_from_indices(
        &self,
        indices: &BTreeMap<String, usize>,
    ) -> Result<AnswerSet, AssessmentError> {
        let mut answers = AnswerSet::default();
        for (question_id, option_index) in indices {
            self.record_answer(&mut answers, question_id, *option_index)?;
        }
        Ok(answers)
    }

    pub fn is_complete(&self, answers: &AnswerSet) -> bool {
        self.questions
            .iter()
            .all(|question| answers.get(question.id).is_some())
    }

    pub fn unanswered(&self, answers: &AnswerSet) -> Vec<&'static str> {
        self.questions
            .iter()
            .filter(|question| answers.get(question.id).is_none())
            .map(|question| question.id)
            .collect()
    }

    pub fn compute_score(&self, answers: &AnswerSet) -> Result<u16, AssessmentError> {
        let missing = self.unanswered(answers);
        if !missing.is_empty() {
            return Err(AssessmentError::Incomplete { missing });
        }
        Ok(answers.total_points())
    }
}

fn options(entries: [(&'static str, u16); 3]) -> Vec<AnswerOption> {
    entries
        .into_iter()
        .map(|(label, points)| AnswerOption { label, points })
        .collect()
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            id: "q1",
            category: Category::DigitalAssetOrganization,
            prompt: "Do you maintain an updated list of your digital assets (e.g., crypto wallets, cloud accounts, domains, etc.)?",
            options: options([
                ("Yes, it's complete and updated regularly", 20),
                ("Somewhat, but it's incomplete", 10),
                ("No, I haven't started", 0),
            ]),
        },
        Question {
            id: "q2",
            category: Category::DigitalAssetOrganization,
            prompt: "Are your digital files and credentials stored in a secure, centralized location?",
            options: options([
                ("Yes — in an encrypted vault or password manager", 20),
                ("Partially — scattered across accounts", 10),
                ("No — unorganized or offline only", 0),
            ]),
        },
        Question {
            id: "q3",
            category: Category::SecurityAndAccess,
            prompt: "How do you secure access to your key accounts and devices?",
            options: options([
                ("Multi-factor + biometric authentication", 20),
                ("Passwords only", 10),
                ("Minimal or no protection", 0),
            ]),
        },
        Question {
            id: "q4",
            category: Category::SecurityAndAccess,
            prompt: "Are your crypto keys, wallets, or sensitive data stored with post-quantum or hardware-level security?",
            options: options([
                ("Yes — quantum/hardware-level protection", 20),
                ("Basic encryption", 10),
                ("Unsure or none", 0),
            ]),
        },
        Question {
            id: "q5",
            category: Category::LegalReadiness,
            prompt: "Do your estate documents (will, trust, power of attorney) explicitly cover your digital assets?",
            options: options([
                ("Yes — reviewed and current", 15),
                ("Somewhat — included but outdated", 8),
                ("No — not yet addressed", 0),
            ]),
        },
        Question {
            id: "q6",
            category: Category::LegalReadiness,
            prompt: "Have you designated digital beneficiaries or executors?",
            options: options([
                ("Yes — with legal documentation", 15),
                ("Verbal or informal plan only", 8),
                ("No plan in place", 0),
            ]),
        },
        Question {
            id: "q7",
            category: Category::FamilyCommunication,
            prompt: "Have you discussed or documented how to access your key accounts or assets with family or trusted contacts?",
            options: options([
                ("Yes — they know exactly what to do", 15),
                ("Partially — we've talked but not documented", 8),
                ("No — not yet", 0),
            ]),
        },
        Question {
            id: "q8",
            category: Category::FamilyCommunication,
            prompt: "Do you have time-locked or event-triggered messages prepared for loved ones?",
            options: options([
                ("Yes — I've recorded messages", 15),
                ("Not yet, but I plan to", 8),
                ("No", 0),
            ]),
        },
        Question {
            id: "q9",
            category: Category::EmergencyPreparedness,
            prompt: "If something happened tomorrow, could someone access your key information within 48 hours?",
            options: options([
                ("Yes — via a crisis binder or plan", 15),
                ("Possibly — it would take effort", 8),
                ("No — they'd struggle to find it", 0),
            ]),
        },
        Question {
            id: "q10",
            category: Category::EmotionalLegacy,
            prompt: "Have you left written, audio, or video messages for family to receive in the future?",
            options: options([
                ("Yes — securely stored and scheduled", 15),
                ("Not yet — but I intend to", 8),
                ("No — haven't thought about it", 0),
            ]),
        },
    ]
}
