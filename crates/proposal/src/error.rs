use thiserror::Error;

use amplify_core::errors::{ApplicationError, DomainError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProposalError {
    #[error("invalid proposal request: {0}")]
    Validation(String),
    #[error("template rendering failed: {0}")]
    Template(String),
    #[error("text generation failed: {0}")]
    Generation(String),
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("proposal service misconfigured: {0}")]
    Configuration(String),
}

impl From<tera::Error> for ProposalError {
    fn from(error: tera::Error) -> Self {
        // tera nests the useful part of the message in the source chain
        let mut message = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Template(message)
    }
}

impl From<ProposalError> for ApplicationError {
    fn from(error: ProposalError) -> Self {
        match error {
            ProposalError::Validation(message) => {
                Self::Domain(DomainError::InvariantViolation(message))
            }
            ProposalError::Generation(message) | ProposalError::Transport(message) => {
                Self::Integration(message)
            }
            ProposalError::Template(message) | ProposalError::Configuration(message) => {
                Self::Configuration(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use amplify_core::errors::{ApplicationError, InterfaceError};

    use super::ProposalError;

    #[test]
    fn transport_failures_surface_as_service_unavailable() {
        let interface = ApplicationError::from(ProposalError::Transport("502".to_string()))
            .into_interface("req-1");
        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
    }

    #[test]
    fn validation_failures_surface_as_bad_request() {
        let interface = ApplicationError::from(ProposalError::Validation(
            "Valid email address is required".to_string(),
        ))
        .into_interface("req-2");
        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
    }
}
