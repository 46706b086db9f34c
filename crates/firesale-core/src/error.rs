use std::{io, path::PathBuf};

/// A read or write failure at the File Service boundary.
///
/// These are logged and shown to the user as a non-blocking notice; they are
/// never fatal and never affect other windows.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is {len} bytes, over the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, len: u64, limit: u64 },
}

