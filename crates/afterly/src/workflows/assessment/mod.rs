//! LegacyScore readiness assessment.
//!
//! A fixed catalog of ten questions, each with mutually exclusive scored
//! options. Answers accumulate into an [`AnswerSet`]; a complete set sums to a
//! score that [`classify`] maps onto a [`ReadinessTier`] with canned
//! recommendations.
//!
//! The reference points add up to 180 while the tier thresholds (80 / 50)
//! were written for a scale near 100. Both are kept literally;
//! [`AssessmentCatalog::max_score`] exposes the real ceiling.

mod answers;
mod catalog;
pub mod domain;
mod outcome;
pub mod router;
mod session;
mod tiers;

pub use answers::{AnswerSet, Selection};
pub use catalog::AssessmentCatalog;
pub use domain::{AnswerOption, AssessmentError, Category, Question, SelectionFault};
pub use outcome::{AssessmentOutcome, CategoryScore};
pub use router::assessment_router;
pub use session::{AssessmentSession, SessionPhase, SessionProgress};
pub use tiers::{classify, ReadinessTier, TierProfile, DEVELOPING_THRESHOLD, PREPARED_THRESHOLD};
