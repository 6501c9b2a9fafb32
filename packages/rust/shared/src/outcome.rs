//! Result of an external call that never fails outright.
//!
//! Every call to the model or the index either succeeds or falls back to a
//! fixed value. [`Outcome`] records which of the two happened; the carried
//! value has the same shape either way.

/// A value produced either by a successful call or by a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The external call succeeded.
    Success(T),
    /// The external call failed; `value` is the fallback that replaces it.
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    /// Build a degraded outcome from a fallback and any displayable cause.
    pub fn degraded(value: T, reason: impl std::fmt::Display) -> Self {
        Self::Degraded {
            value,
            reason: reason.to_string(),
        }
    }

    /// Borrow the carried value, whichever path produced it.
    pub fn value(&self) -> &T {
        match self {
            Self::Success(value) | Self::Degraded { value, .. } => value,
        }
    }

    /// Take the carried value, whichever path produced it.
    pub fn into_value(self) -> T {
        match self {
            Self::Success(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The failure reason, if this is a fallback.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Transform the carried value, keeping the path and reason.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
