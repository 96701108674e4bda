//! Common shape of the pricing engines.

use super::models::StoredCalculation;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid country selected: {0}")]
    InvalidCountry(String),

    #[error("Invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

/// A market-specific pricing formula.
///
/// Engines are pure: no I/O, no shared mutable state. The returned
/// calculation is the value a caller may archive unchanged.
pub trait PricingEngine {
    type Request;
    type Calculation: StoredCalculation;

    fn calculate(&self, request: &Self::Request) -> Result<Self::Calculation, PricingError>;
}
