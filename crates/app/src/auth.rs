//! Shared-secret guard for voice-assistant skill requests.
//!
//! The skill (or the microcontroller driving the device) sends a static
//! token in a header. The guard compares it against the configured secret
//! and fails closed when no secret is configured.

/// Why a skill request was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// No secret is configured on the server side.
    #[error("skill token is not configured")]
    NotConfigured,

    /// The presented token is missing or does not match.
    #[error("invalid skill token")]
    InvalidToken,
}

/// Stateless predicate over the configured secret and a presented token.
#[derive(Clone, Default)]
pub struct SkillTokenGuard {
    expected: Option<String>,
}

impl std::fmt::Debug for SkillTokenGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillTokenGuard")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SkillTokenGuard {
    /// Build a guard; an empty secret counts as not configured.
    #[must_use]
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|secret| !secret.is_empty()),
        }
    }

    /// Whether a secret is available to compare against.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Accept the request only when `presented` equals the configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotConfigured`] when no secret is set, and
    /// [`AuthError::InvalidToken`] when `presented` is absent or differs.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        let expected = self.expected.as_deref().ok_or(AuthError::NotConfigured)?;
        match presented {
            Some(token) if constant_time_eq(expected.as_bytes(), token.as_bytes()) => Ok(()),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    lhs.iter().zip(rhs).fold(0u8, |diff, (a, b)| diff | (a ^ b)) == 0
}
