use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to create directory at {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("filesystem entry at {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read settings file at {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
}
