//! Disk I/O helpers: directory setup, load from file and atomic write.
//!
//! Every write lands in a `.tmp` sibling first and is renamed over the real
//! file, so readers of the path only ever see a complete old or new file.
//! Once the rename succeeds the write counts as done: a failed directory
//! fsync afterwards is logged, not returned, because the new content is
//! already what the path holds.

use crate::codec::Codec;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Creates the directory containing `path`, and any missing ancestors.
/// Nothing to do for a bare file name relative to the working directory.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(parent).map_err(Error::from)
}

/// Reads and decodes the file at `path`. Returns an empty map if the file
/// is missing or empty (not an error).
pub fn load<T, C>(path: &Path, codec: &C) -> Result<HashMap<String, T>>
where
    T: DeserializeOwned,
    C: Codec,
{
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(Error::from(e)),
    };
    if bytes.is_empty() {
        return Ok(HashMap::new());
    }
    codec.decode(&bytes)
}

/// Sibling path used while writing: `db.json` -> `db.json.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`, so a crash
/// mid-write never leaves a half-written file in place. With `sync` the temp
/// file is fsynced before the rename and the directory after it.
///
/// Returns `Err` only if `path` still holds its previous content.
pub fn atomic_write(path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let tmp = temp_path(path);
    let result = write_file(&tmp, bytes, sync).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(Error::from(e));
    }
    if sync {
        sync_parent_dir_logged(path);
    }
    Ok(())
}

fn sync_parent_dir_logged(path: &Path) {
    if let Err(e) = sync_parent_dir(path) {
        warn!(path = %path.display(), error = %e, "directory fsync failed after rename");
    }
}

fn write_file(path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(FILE_MODE);
    }
    let mut file = opts.open(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

// NTFS journals metadata; directory handles can't be fsynced there anyway.
#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
