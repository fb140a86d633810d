use thiserror::Error;

/// Errors surfaced by the gamemode layer.
///
/// Everything else in the rule engine is infallible by construction: weighted
/// selection and health rolling always fall back to a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardianError {
    /// Unrecognized discriminator, malformed settings document, or settings
    /// that fail validation. Fatal: a gamemode cannot run without settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Malformed user text (chat). Reported to the chat feed, never fatal.
    #[error("{0}")]
    TransientInput(String),
}

impl GuardianError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_errors_are_fatal() {
        assert!(GuardianError::invalid_config("bad").is_fatal());
        assert!(!GuardianError::TransientInput("Bad markup.".into()).is_fatal());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            GuardianError::invalid_config("unknown gamemode type: Golf").to_string(),
            "invalid configuration: unknown gamemode type: Golf"
        );
        assert_eq!(
            GuardianError::TransientInput("Bad markup.".into()).to_string(),
            "Bad markup."
        );
    }
}
