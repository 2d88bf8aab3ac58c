//! Operator-facing console output.
//!
//! Diagnostics go through `tracing`; this module prints the progress lines a
//! user reads while a command runs.

use std::fmt::Display;
use std::path::Path;

use colored::{Color, Colorize};
use supports_color::Stream;

/// Enables colours only when stdout can render them
pub fn init_colors() {
    colored::control::set_override(supports_color::on(Stream::Stdout).is_some());
}

pub fn header(title: impl Display) {
    println!("{}", format!("=== {title} ===").bold());
}

pub fn field(label: &str, value: impl Display) {
    println!("{}: {value}", label.bold());
}

pub fn blank() {
    println!();
}

pub fn line(message: impl Display) {
    println!("{message}");
}

pub fn copied(source: &Path, destination: &Path) {
    println!("    {} -> {}", source.display(), destination.display());
}

pub fn tagged(tag: impl Display, color: Color, message: impl Display) {
    println!("  {} {message}", format!("[{tag}]").color(color).bold());
}

pub fn success(message: impl Display) {
    println!("{}", message.to_string().green());
}

pub fn failure(message: impl Display) {
    println!("{}", message.to_string().red());
}
