use thiserror::Error;

/// Failure to read the scorer's bracketed-tuple output. Offsets are byte
/// positions in the raw text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerParseError {
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { offset: usize, found: char },
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("expected {expected} at byte {offset}, found {found}")]
    Unexpected {
        offset: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("invalid module index {value:?} at byte {offset}")]
    InvalidIndex { offset: usize, value: String },
    #[error("invalid number {value:?} at byte {offset}")]
    InvalidNumber { offset: usize, value: String },
    #[error("module p-value {value} at byte {offset} is outside [0, 1]")]
    PvalueOutOfRange { offset: usize, value: f64 },
    #[error("module index {index} appears twice (second at byte {offset})")]
    DuplicateIndex { offset: usize, index: i64 },
}
