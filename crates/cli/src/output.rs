//! Terminal reporting for gomatrix commands.
//!
//! Per-pair and per-platform results are status lines on stdout; failures and
//! warnings go to stderr so they survive `2>` redirection next to the tracing
//! log. `-o json` bypasses all of this through [`emit_json`].

use std::fmt::Display;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Separates a built or placed item from where it ended up.
pub const ARROW: &str = "→";

/// Outcome shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Failed,
  Warn,
  Note,
}

impl Status {
  pub fn marker(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Failed => "✗",
      Status::Warn => "⚠",
      Status::Note => "•",
    }
  }

  fn stream(self) -> Stream {
    match self {
      Status::Failed | Status::Warn => Stream::Stderr,
      Status::Done | Status::Note => Stream::Stdout,
    }
  }

  fn paint(self, text: &str) -> String {
    let stream = self.stream();
    match self {
      Status::Done => text.if_supports_color(stream, |s| s.green()).to_string(),
      Status::Failed => text.if_supports_color(stream, |s| s.red()).to_string(),
      Status::Warn => text.if_supports_color(stream, |s| s.yellow()).to_string(),
      Status::Note => text.if_supports_color(stream, |s| s.blue()).to_string(),
    }
  }

  /// Prints `message` behind this status' marker.
  ///
  /// Problem lines are colored as a whole; the others only color the marker.
  pub fn report(self, message: impl Display) {
    let marker = self.paint(self.marker());
    match self.stream() {
      Stream::Stderr => eprintln!("{} {}", marker, self.paint(&message.to_string())),
      _ => println!("{} {}", marker, message),
    }
  }
}

/// Prints an indented `label: value` line, as used by summaries.
pub fn field(label: &str, value: impl Display) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn emit_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
