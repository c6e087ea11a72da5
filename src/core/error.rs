use thiserror::Error;

/// Hard construction errors. Any of these aborts the build before a package
/// is returned; there is no partial or degraded package.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("requester '{requested_by}' does not own this snapshot (owner: '{owner}')")]
    NotAuthorized { requested_by: String, owner: String },

    #[error("non-USD currency '{currency}' on {row_kind} {row_id}")]
    NonUsdCurrency {
        row_kind: &'static str,
        row_id: String,
        currency: String,
    },

    #[error("failed to load rows: {0}")]
    DataLoadFailed(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}
