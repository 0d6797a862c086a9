/// Errors from the domain calculators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("unsupported {kind}: {value}")]
    UnsupportedValue { kind: &'static str, value: String },
}

impl CalcError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid(name, format!("must be > 0, got {value}")));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid(name, format!("must be >= 0, got {value}")));
    }
    Ok(())
}
