use anyhow::Result;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use gomatrix_lib::registry::{BuildMode, Category, Target};

use super::Context;
use crate::output::{OutputFormat, emit_json};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
  Server,
  Client,
  Test,
}

impl From<CategoryArg> for Category {
  fn from(arg: CategoryArg) -> Self {
    match arg {
      CategoryArg::Server => Category::Server,
      CategoryArg::Client => Category::Client,
      CategoryArg::Test => Category::Test,
    }
  }
}

pub fn cmd_targets(ctx: &Context, category: Option<CategoryArg>, output: OutputFormat) -> Result<()> {
  let targets: Vec<Target> = match category {
    Some(c) => ctx.registry.targets(c.into()).to_vec(),
    None => ctx.registry.all_targets(),
  };

  if output.is_json() {
    return emit_json(&targets);
  }

  if targets.is_empty() {
    println!("No targets.");
    return Ok(());
  }

  let width = targets.iter().map(|t| t.path().len()).max().unwrap_or(0);
  for target in &targets {
    let mode = match target.mode() {
      BuildMode::Static => "static",
      BuildMode::Dynamic => "dynamic",
    };
    println!(
      "{:<width$}  {:<6}  {}",
      target.path(),
      target.category(),
      mode.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      width = width
    );
  }
  Ok(())
}
