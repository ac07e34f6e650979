mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gomatrix_lib::consts::APP_NAME;
use gomatrix_lib::platform::Platform;
use gomatrix_lib::setup::SetupError;

use cmd::{BuildArgs, CategoryArg, Context};
use output::{OutputFormat, Status};

/// gomatrix - build Go monorepo binaries for a matrix of platforms
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Config file (default: ./gomatrix.toml when present)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Repository source root
  #[arg(long, global = true, value_name = "DIR")]
  source: Option<PathBuf>,

  /// Output base directory (GOPATH workspace and placed binaries)
  #[arg(long, global = true, value_name = "DIR")]
  out_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build targets for one or more platforms
  Build(BuildArgs),

  /// Copy built binaries into <DIR>/<os>/<arch>/
  Place {
    /// Destination directory (default: <out-dir>/bin)
    dir: Option<PathBuf>,

    /// Platform to place (repeatable; default: client platforms)
    #[arg(long = "platform", value_name = "OS/ARCH")]
    platforms: Vec<Platform>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Prepare the build environment and print GOPATH
  Setup {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// List known targets and their build modes
  Targets {
    /// Only list one category
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show host, current and configured platforms
  Platforms {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(code) => code,
    Err(err) => {
      Status::Failed.report(format_args!("{:#}", err));
      exit_code(&err)
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let ctx = Context::load(cli.config.as_deref(), cli.source, cli.out_dir)?;

  match cli.command {
    Commands::Build(args) => cmd::cmd_build(&ctx, args),
    Commands::Place { dir, platforms, output } => cmd::cmd_place(&ctx, dir, platforms, output).map(|()| ExitCode::SUCCESS),
    Commands::Setup { output } => cmd::cmd_setup(&ctx, output).map(|()| ExitCode::SUCCESS),
    Commands::Targets { category, output } => cmd::cmd_targets(&ctx, category, output).map(|()| ExitCode::SUCCESS),
    Commands::Platforms { output } => cmd::cmd_platforms(&ctx, output).map(|()| ExitCode::SUCCESS),
  }
}

/// Toolchain problems get their own exit code; everything else is 1.
fn exit_code(err: &anyhow::Error) -> ExitCode {
  match err.downcast_ref::<SetupError>() {
    Some(e) => ExitCode::from(e.exit_code() as u8),
    None => ExitCode::FAILURE,
  }
}
