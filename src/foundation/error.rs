/// Convenience result type used across yuvslice.
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Top-level error taxonomy used by the scaler APIs.
///
/// Running out of input rows is not represented here: a streaming call that
/// cannot emit anything yet returns `Ok(0)`.
#[derive(thiserror::Error, Debug)]
pub enum ScaleError {
    /// Invalid dimensions, formats or options. Fatal at context creation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A synthesized filter needs more taps than the supported maximum.
    ///
    /// Callers are expected to fall back to a coarser (cascaded) strategy.
    #[error("capacity error: {0}")]
    Capacity(String),

    /// The caller or an internal stage broke a row-window contract
    /// (misaligned or out-of-order rows, short buffers, stale ring rows).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScaleError {
    /// Build a [`ScaleError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ScaleError::Capacity`] value.
    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    /// Build a [`ScaleError::ContractViolation`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// `true` for errors that can only be raised while building a context.
    pub fn is_fatal_at_create(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Capacity(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
