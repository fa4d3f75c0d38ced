//! Event error types

use thiserror::Error;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors that can occur while constructing an event
#[derive(Debug, Error)]
pub enum EventError {
    /// The input was not valid JSON
    #[error("invalid event document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but is not a JSON object
    #[error("event document must be a JSON object")]
    NotAnObject,

    /// A legacy frame did not follow the `<queue>:<location>:<payload>` shape
    #[error("malformed legacy frame: {reason}")]
    MalformedFrame {
        /// What was wrong with the frame
        reason: &'static str,
    },
}

impl EventError {
    /// Create a MalformedFrame error
    #[inline]
    pub fn malformed_frame(reason: &'static str) -> Self {
        Self::MalformedFrame { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_object_display() {
        let err = EventError::NotAnObject;
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn test_malformed_frame_display() {
        let err = EventError::malformed_frame("missing location separator");
        assert!(err.to_string().contains("missing location separator"));
    }
}
