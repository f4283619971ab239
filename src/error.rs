/// Boxed error returned by result set implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RowJsonError {
    /// The result set was missing or already closed before encoding began.
    #[error("empty result set")]
    EmptyResultSet,
    /// Column metadata could not be read; no rows were fetched.
    #[error("metadata error: {0}")]
    Metadata(#[source] BoxError),
    /// Advancing or scanning the result set failed mid-stream.
    #[error("row read error: {0}")]
    RowRead(#[source] BoxError),
    /// The cancellation signal fired before the document was complete.
    #[error("cancelled{}", cause_suffix(.cause))]
    Cancelled {
        /// Underlying cause reported by the signal, if any.
        cause: Option<String>,
    },
    /// The encoded document could not be decoded into the target type.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

fn cause_suffix(cause: &Option<String>) -> String {
    cause
        .as_deref()
        .map(|cause| format!(": {cause}"))
        .unwrap_or_default()
}

impl RowJsonError {
    /// Returns `true` when re-running the whole query may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RowRead(_))
    }

    /// Returns `true` for deadline or cancellation failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::RowJsonError;

    #[test]
    fn cancelled_display_includes_cause() {
        let err = RowJsonError::Cancelled {
            cause: Some("deadline exceeded".to_owned()),
        };
        assert_eq!(err.to_string(), "cancelled: deadline exceeded");
        assert_eq!(
            RowJsonError::Cancelled { cause: None }.to_string(),
            "cancelled"
        );
    }

    #[test]
    fn only_row_read_is_retryable() {
        assert!(RowJsonError::RowRead("connection reset".into()).is_retryable());
        assert!(!RowJsonError::EmptyResultSet.is_retryable());
        assert!(!RowJsonError::Metadata("gone".into()).is_retryable());
        assert!(!RowJsonError::Cancelled { cause: None }.is_retryable());
        assert!(RowJsonError::Cancelled { cause: None }.is_cancelled());
    }
}
