//! # Validation Module
//!
//! Input validation for todo requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport                                                    │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (no lock held)                                   │
//! │  └── Required fields                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (write lock held)                                      │
//! │  └── Identifier existence                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

/// Validates a todo title.
///
/// ## Rules
/// - Must not be empty
/// - Whitespace-only counts as empty
///
/// The title itself is kept as given; only the check trims.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_title;
///
/// assert!(validate_title("Learn X").is_ok());
/// assert!(validate_title("").is_err());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::required("title"));
    }

    Ok(())
}

/// Normalizes an optional description.
///
/// Transports built on proto3 cannot tell an empty string from an absent
/// one, so both collapse to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
