use std::path::PathBuf;

use thiserror::Error;

/// The only fault the analyzer cannot absorb. Everything per-file is
/// downgraded to a warning at its point of origin and never reaches here.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The project root itself cannot be enumerated.
    #[error("cannot read project root {root}: {source}")]
    RootUnreadable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
