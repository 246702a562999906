use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("malformed coordinate token {token:?}")]
    MalformedCoordinates { token: String },

    #[error("a polygon needs at least 3 points, got {count}")]
    InvalidGeometry { count: usize },

    #[error("failed to write overlay image")]
    Render(#[from] image::ImageError),
}
