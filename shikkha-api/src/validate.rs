//! Semantic checks applied to payloads after they have been decoded.

use crate::types::LessonId;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Empty {0} id")]
    EmptyId(&'static str),
    #[error("Lesson id {0} appears more than once in the course")]
    DuplicateLesson(LessonId),
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
    #[error("Empty playback URL")]
    EmptyPlaybackUrl,
    #[error("Empty token")]
    EmptyToken,
}

/// Implemented by every response type. Decoding already guarantees the shape of a payload;
/// `validate` checks the invariants the frontend relies on.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}
