use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures talking to the instance inventory.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// The provider rejected or never answered a request (auth, network, throttling).
    #[error("{operation} request failed")]
    Provider {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{operation} response is missing `{field}`")]
    MalformedResponse {
        operation: &'static str,
        field: &'static str,
    },
}

impl CleanerError {
    pub fn provider(operation: &'static str, source: impl Into<BoxError>) -> Self {
        CleanerError::Provider {
            operation,
            source: source.into(),
        }
    }

    /// This error followed by every underlying cause, `: `-separated.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}

pub type Result<T, E = CleanerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_names_the_operation() {
        let err = CleanerError::provider("DescribeInstances", "expired token");
        assert_eq!(err.to_string(), "DescribeInstances request failed");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "expired token");
        assert_eq!(err.report(), "DescribeInstances request failed: expired token");
    }

    #[test]
    fn malformed_response_names_the_field() {
        let err = CleanerError::MalformedResponse {
            operation: "TerminateInstances",
            field: "TerminatingInstances",
        };
        assert!(err.to_string().contains("`TerminatingInstances`"));
    }
}
