use thiserror::Error;

/// Failure loading an optional asset (texture or boundary data).
///
/// Never fatal: callers fall back to rendering without the asset.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("invalid boundary data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("asset loader stopped before delivering a result")]
    Disconnected,
}
