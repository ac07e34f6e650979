//! Filesystem helpers.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Creates a directory link at `link` pointing to `target`.
pub fn link_dir(target: &Path, link: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    std::os::unix::fs::symlink(target, link)
  }
  #[cfg(windows)]
  {
    std::os::windows::fs::symlink_dir(target, link)
  }
}

/// Removes whatever is at `path` (file, link or directory tree).
///
/// Links are removed without touching what they point to. A missing path is
/// not an error.
pub fn remove_entry(path: &Path) -> io::Result<()> {
  let meta = match fs::symlink_metadata(path) {
    Ok(meta) => meta,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => return Err(e),
  };

  if meta.file_type().is_symlink() {
    // directory symlinks on Windows must be removed as directories
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
  } else if meta.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  }
}

/// Whether the current user may create entries in `dir`.
#[cfg(unix)]
pub fn is_writable(dir: &Path) -> bool {
  rustix::fs::access(dir, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_writable(dir: &Path) -> bool {
  fs::metadata(dir)
    .map(|m| !m.permissions().readonly())
    .unwrap_or(false)
}

/// Copies a regular file, keeping its permissions and modification time.
pub fn copy_preserving(src: &Path, dst: &Path) -> io::Result<()> {
  let meta = fs::metadata(src)?;
  // a read-only destination cannot be opened for writing, so replace it
  match fs::remove_file(dst) {
    Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
    _ => {}
  }
  // fs::copy carries the permission bits over
  fs::copy(src, dst)?;
  let modified = meta.modified()?;
  let file = File::options()
    .write(true)
    .open(dst)
    .or_else(|_| File::open(dst))?;
  file.set_modified(modified)?;
  Ok(())
}
