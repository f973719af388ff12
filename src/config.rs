use crate::binding::MAX_ARITY;
use crate::errors::{ActivationError, Result};

/// Activator options.
#[derive(Clone, Debug)]
pub struct ActivatorOptions {
    max_arity: usize,
}

impl Default for ActivatorOptions {
    fn default() -> Self {
        Self { max_arity: MAX_ARITY }
    }
}

impl ActivatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower the dependency-count limit. Values above [`MAX_ARITY`] are
    /// rejected rather than clamped.
    pub fn with_max_arity(mut self, max_arity: usize) -> Result<Self> {
        if max_arity > MAX_ARITY {
            return Err(ActivationError::InvalidOptions(format!(
                "max_arity {max_arity} exceeds the supported limit of {MAX_ARITY}"
            )));
        }
        self.max_arity = max_arity;
        Ok(self)
    }

    pub fn max_arity(&self) -> usize {
        self.max_arity
    }
}
