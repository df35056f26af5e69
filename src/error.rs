use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures. Each one aborts the run at the first occurrence.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File {} supplied as index {index}, expected index {expected}", path.display())]
    OutOfOrder {
        path: PathBuf,
        index: usize,
        expected: usize,
    },

    #[error("Image of {width}x{height} pixels is too large to encode")]
    Dimensions { width: usize, height: usize },

    #[error("Failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
