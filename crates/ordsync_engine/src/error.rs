//! Error types for the synchronization engine.

use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during synchronization.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Bad or missing settings; fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad caller input; fatal.
    #[error("validation error: {0}")]
    Validation(String),

    /// Login to the storefront failed; fatal for this invocation.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A storefront fault that is not the session-expiry code (that one
    /// is recovered inside the client and never reaches the engine).
    #[error("storefront fault ({code}): {message}")]
    Rpc {
        /// Numeric fault code from the storefront.
        code: i32,
        /// Fault message.
        message: String,
    },

    /// The import lock could not be acquired within the poll budget.
    /// The caller may reschedule the whole run.
    #[error("cannot lock order importing after {attempts} attempts")]
    LockTimeout {
        /// Number of acquisition attempts made.
        attempts: u32,
    },

    /// The order-transform hook misbehaved; the order is marked
    /// failed-to-submit.
    #[error("order transform failed: {0}")]
    Transform(String),

    /// No shipping rule matched and no fallback method exists; fatal for
    /// that order.
    #[error("cannot determine shipping method: {0}")]
    Classification(String),

    /// Order creation on the warehouse failed. Treated as a data error:
    /// never eligible for automatic retry, to avoid duplicate submissions.
    #[error("order creation failed: {0}")]
    OrderCreate(String),

    /// The storefront rejected or mangled an operation.
    #[error("storefront error: {0}")]
    Storefront(String),

    /// The warehouse rejected or mangled an operation.
    #[error("warehouse error: {0}")]
    Warehouse(String),

    /// The external state store failed.
    #[error("state store error: {0}")]
    State(String),
}

impl SyncError {
    /// Returns true if rescheduling the same operation can succeed.
    ///
    /// Only lock contention qualifies; in particular `OrderCreate` is
    /// deliberately non-retryable even when the underlying failure looks
    /// transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::LockTimeout { .. })
    }
}

impl From<ordsync_client::ClientError> for SyncError {
    fn from(err: ordsync_client::ClientError) -> Self {
        use ordsync_client::ClientError;
        match err {
            ClientError::Auth(message) => SyncError::Auth(message),
            ClientError::Fault { code, message } => SyncError::Rpc { code, message },
            ClientError::Decode(message) => SyncError::Storefront(message),
            ClientError::Config(message) => SyncError::Configuration(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordsync_client::ClientError;

    #[test]
    fn only_lock_timeouts_are_retryable() {
        assert!(SyncError::LockTimeout { attempts: 20 }.is_retryable());
        assert!(!SyncError::OrderCreate("duplicate sku".into()).is_retryable());
        assert!(!SyncError::Transform("hook panicked".into()).is_retryable());
        assert!(!SyncError::Rpc {
            code: 1,
            message: "internal".into()
        }
        .is_retryable());
    }

    #[test]
    fn client_errors_map_onto_the_taxonomy() {
        let err: SyncError = ClientError::Auth("denied".into()).into();
        assert!(matches!(err, SyncError::Auth(_)));

        let err: SyncError = ClientError::Fault {
            code: 100,
            message: "not exists".into(),
        }
        .into();
        assert!(matches!(err, SyncError::Rpc { code: 100, .. }));
    }

    #[test]
    fn lock_timeout_display() {
        let err = SyncError::LockTimeout { attempts: 20 };
        assert_eq!(
            err.to_string(),
            "cannot lock order importing after 20 attempts"
        );
    }
}
