use std::path::PathBuf;
use thiserror::Error;

/// Failures on the consumer side of the bridge. The five contract operations
/// themselves never fail; these surface while wiring a service up.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to load service library {path}: {reason}")]
    LibraryOpen { path: PathBuf, reason: String },

    #[error("Service library {path} does not export `{symbol}`")]
    MissingSymbol { path: PathBuf, symbol: String },

    #[error("`{symbol}` cannot be read as a {size}-byte value; symbols are pointer sized")]
    SymbolSize { symbol: String, size: usize },

    #[error("Library path {0} contains an interior NUL byte")]
    InvalidPath(PathBuf),

    #[error("All {slots} doorbell slots are claimed")]
    DoorbellsExhausted { slots: usize },
}
