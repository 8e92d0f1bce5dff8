/// Failures talking to the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status} for {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },

    /// The body was not the expected JSON envelope.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
}
