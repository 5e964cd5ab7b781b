//! Identifier generation.
//!
//! The store treats identifiers as opaque strings produced by an
//! [`IdGenerator`]. UUID v4 is the default.

use thiserror::Error;
use uuid::Uuid;

/// Failure reported by an [`IdGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct IdGenerationError(String);

impl IdGenerationError {
    pub fn new(reason: impl Into<String>) -> Self {
        IdGenerationError(reason.into())
    }
}

/// Source of new todo identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn generate(&self) -> Result<String, IdGenerationError>;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Result<String, IdGenerationError> {
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator_produces_distinct_v4_ids() {
        let generator = UuidGenerator;
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();

        assert_ne!(a, b);
        assert_eq!(Uuid::parse_str(&a).unwrap().get_version_num(), 4);
    }
}
