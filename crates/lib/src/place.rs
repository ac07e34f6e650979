//! Artifact placement.
//!
//! Copies binaries from the toolchain's per-platform bin directories into
//! `<output_bin_dir>/<os>/<arch>/`, so callers find every binary at the same
//! place whether it was built natively or cross-compiled.
//!
//! Placement only adds or overwrites files. Platforms that were not built are
//! skipped and nothing is ever deleted.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::platform::Platform;
use crate::setup::BinLayout;
use crate::util::fs::copy_preserving;

#[derive(Debug, Error)]
pub enum PlaceError {
  #[error("failed to {action} {}: {source}", path.display())]
  Filesystem {
    action: &'static str,
    path: PathBuf,
    source: io::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },
}

/// Files placed for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedPlatform {
  pub platform: Platform,
  pub dest: PathBuf,
  pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceReport {
  pub placed: Vec<PlacedPlatform>,
  /// Platforms with no build output.
  pub skipped: Vec<Platform>,
}

impl PlaceReport {
  pub fn file_count(&self) -> usize {
    self.placed.iter().map(|p| p.files.len()).sum()
  }
}

/// Places binaries for each of `platforms` under `output_bin_dir`.
pub fn place_binaries(
  layout: &BinLayout,
  platforms: &[Platform],
  output_bin_dir: &Path,
) -> Result<PlaceReport, PlaceError> {
  let mut report = PlaceReport::default();

  for &platform in platforms {
    let src = layout.dir_for(platform);
    match src.metadata() {
      Ok(meta) if meta.is_dir() => {}
      Ok(_) => {
        warn!(platform = %platform, path = %src.display(), "bin path is not a directory; skipping");
        report.skipped.push(platform);
        continue;
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(platform = %platform, "not built; skipping");
        report.skipped.push(platform);
        continue;
      }
      Err(source) => {
        return Err(PlaceError::Filesystem {
          action: "inspect",
          path: src,
          source,
        });
      }
    }

    let dest = output_bin_dir.join(platform.to_string());
    std::fs::create_dir_all(&dest).map_err(|source| PlaceError::Filesystem {
      action: "create directory",
      path: dest.clone(),
      source,
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&src).min_depth(1).max_depth(1).sort_by_file_name() {
      let entry = entry.map_err(|source| PlaceError::Walk {
        path: src.clone(),
        source,
      })?;
      if !entry.file_type().is_file() {
        continue;
      }
      let target = dest.join(entry.file_name());
      copy_preserving(entry.path(), &target).map_err(|source| PlaceError::Filesystem {
        action: "copy",
        path: entry.path().to_path_buf(),
        source,
      })?;
      files.push(target);
    }

    info!(platform = %platform, count = files.len(), dest = %dest.display(), "placed binaries");
    report.placed.push(PlacedPlatform {
      platform,
      dest,
      files,
    });
  }

  Ok(report)
}
