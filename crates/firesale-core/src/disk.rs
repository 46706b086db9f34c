use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use crate::{FileError, MAX_FILE_BYTES};

/// Read a whole file as UTF-8 text, refusing anything over [`MAX_FILE_BYTES`].
pub fn read_text(path: &Path) -> Result<String, FileError> {
    let read_err = |source| FileError::Read {
        path: path.to_path_buf(),
        source,
    };

    let len = fs::metadata(path).map_err(read_err)?.len();
    if len > MAX_FILE_BYTES {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            len,
            limit: MAX_FILE_BYTES,
        });
    }

    fs::read_to_string(path).map_err(read_err)
}

/// Write `contents` to `path` by way of a sibling temp file and a rename, so
/// readers (and file watchers) never observe a half-written document.
///
/// A symlinked `path` is written through to its target, and an existing
/// file keeps its permissions.
pub fn write_text(path: &Path, contents: &str) -> Result<(), FileError> {
    replace_contents(path, contents).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn replace_contents(path: &Path, contents: &str) -> io::Result<()> {
    let target = resolve_target(path)?;
    if target.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path is missing a file name",
        ));
    }
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing = fs::metadata(&target).ok();

    let mut builder = tempfile::Builder::new();
    builder.prefix(".firesale-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        // The mode a plain create asks for; the umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    // Dropping the temp file on any early return removes it.
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    if let Some(meta) = existing {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    Ok(())
}

/// Where a write to `path` lands: the end of its symlink chain, or `path`
/// itself when it is a plain file or does not exist yet.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path),
        _ => Ok(path.to_path_buf()),
    }
}
