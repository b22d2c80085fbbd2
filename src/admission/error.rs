//! Error types for webhook registration reconciliation.
//!
//! Every failure names the stage it happened in (create/get/patch); nothing
//! is retried here. Retry scheduling belongs to the caller's control loop.

use thiserror::Error;

/// Error type for webhook registration operations
#[derive(Error, Debug)]
pub enum Error {
    /// Trust secret carries no CA bundle under the well-known key
    #[error("secret {0} is missing the policy server CA bundle")]
    MissingCaBundle(String),

    /// Create was rejected for a reason other than already-exists
    #[error("cannot create webhook configuration {name}: {source}")]
    Create {
        name: String,
        #[source]
        source: kube::Error,
    },

    /// Current object could not be fetched, including the case where it
    /// vanished between the create conflict and the fetch
    #[error("cannot retrieve webhook configuration {name}: {source}")]
    Get {
        name: String,
        #[source]
        source: kube::Error,
    },

    /// Merge patch was rejected
    #[error("cannot patch webhook configuration {name}: {source}")]
    Patch {
        name: String,
        #[source]
        source: kube::Error,
    },

    /// Serialization error while computing the merge patch
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error indicates a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Get { source: kube::Error::Api(e), .. } if e.code == 404
        )
    }

    /// Check if the caller should retry on a later reconciliation cycle
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Create { source, .. } | Error::Get { source, .. } | Error::Patch { source, .. } => {
                matches!(source, kube::Error::Api(e) if e.code >= 500 || e.code == 429)
                    || matches!(source, kube::Error::Service(_))
            }
            Error::MissingCaBundle(_) | Error::Serialization(_) => false,
        }
    }
}

/// Whether a create was rejected because the object is already present
pub(crate) fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(e) if e.reason == "AlreadyExists")
}

/// Result type alias for webhook registration operations
pub type Result<T> = std::result::Result<T, Error>;
