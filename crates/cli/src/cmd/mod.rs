mod build;
mod place;
mod platforms;
mod setup;
mod targets;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::debug;

use gomatrix_lib::config::{Config, EnvOverrides};
use gomatrix_lib::consts::CONFIG_FILE_NAME;
use gomatrix_lib::registry::Registry;
use gomatrix_lib::toolchain::GoToolchain;

pub use build::{BuildArgs, cmd_build};
pub use place::cmd_place;
pub use platforms::cmd_platforms;
pub use setup::cmd_setup;
pub use targets::{CategoryArg, cmd_targets};

/// Everything a command needs, resolved once from flags, config and environment.
pub struct Context {
  pub config: Config,
  pub overrides: EnvOverrides,
  pub registry: Registry,
  pub toolchain: GoToolchain,
}

impl Context {
  /// Precedence: command-line flags, then environment, then config file.
  pub fn load(config_path: Option<&Path>, source: Option<PathBuf>, out_dir: Option<PathBuf>) -> Result<Self> {
    let default_path = Path::new(CONFIG_FILE_NAME);
    let path = match config_path {
      Some(p) => Some(p),
      None if default_path.is_file() => Some(default_path),
      None => None,
    };
    let mut config = Config::load(path).context("Failed to load config")?;
    let overrides = EnvOverrides::from_env().context("Invalid environment")?;

    if let Some(dir) = out_dir.or_else(|| overrides.output.clone()) {
      config.output = dir;
    }
    if let Some(dir) = source {
      config.source_root = dir;
    }
    debug!(config = ?path, output = %config.output.display(), "resolved configuration");

    let toolchain = match &overrides.go {
      Some(program) => GoToolchain::new(program),
      None => GoToolchain::default(),
    };

    Ok(Self {
      registry: Registry::from_config(&config),
      config,
      overrides,
      toolchain,
    })
  }
}

/// Single-threaded runtime; toolchain invocations run one at a time.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}
