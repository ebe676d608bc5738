//! Error taxonomy for value generation.
//!
//! Every failure here is local, synchronous and non-retryable: it means the
//! caller misused the generation contract. Configuration problems are
//! rejected when a provider is built, bad arguments when an encoding
//! function is called, and domain exhaustion when a successor or
//! predecessor does not exist.

/// Type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid seed length: expected {expected} words, got {actual}")]
    InvalidSeedLength { expected: usize, actual: usize },

    #[error("Invalid seed hex: {0}")]
    InvalidSeedHex(String),

    #[error("Invalid scale: {name} must be at least {minimum}, got {actual}")]
    InvalidScale {
        name: &'static str,
        minimum: u32,
        actual: u32,
    },

    #[error("Invalid base: base must be at least 2, got {0}")]
    InvalidBase(u32),

    #[error("Invalid digit: {digit} is not a digit in base {base}")]
    InvalidDigit { digit: u32, base: u32 },

    #[error("Invalid arity: cannot demultiplex nonzero {0} into zero components")]
    InvalidArity(String),

    #[error("Invalid ratio: both bit shares must be positive, got {x_share}:{y_share}")]
    InvalidRatio { x_share: u32, y_share: u32 },

    #[error("Invalid bit length: {0}")]
    InvalidBitLength(String),

    #[error("NaN is not a valid argument here")]
    NaN,

    #[error("Ordered representation {0} does not correspond to a non-NaN float")]
    OrderedRepresentationOutOfRange(i64),

    #[error("{0} has no successor")]
    NoSuccessor(String),

    #[error("{0} has no predecessor")]
    NoPredecessor(String),
}

impl GenerationError {
    /// Checks a distribution's scale parameter against its lower bound.
    pub(crate) fn check_scale(name: &'static str, minimum: u32, actual: u32) -> Result<()> {
        if actual < minimum {
            Err(GenerationError::InvalidScale {
                name,
                minimum,
                actual,
            })
        } else {
            Ok(())
        }
    }
}
