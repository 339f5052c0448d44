//! Terminal output for command results
//!
//! Status lines are colored (NO_COLOR, CLICOLOR, CLICOLOR_FORCE are honored by
//! `colored`); trees and documents go out uncolored so they can be piped.

use std::fmt::Display;

use colored::Colorize;

use crate::application::{Move, StepOutcome, StepReport};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Committed move, e.g. `✓ roads -> transport at index 0`.
pub fn moved(m: &Move) {
    let destination = match &m.destination.parent {
        Some(parent) => parent.to_string(),
        None => "root level".to_string(),
    };
    println!(
        "{} {} -> {} at index {}",
        "✓".green(),
        m.id,
        destination,
        m.destination.index
    );
}

/// One replayed event: moves green, rejections red, session changes dimmed.
pub fn step(report: &StepReport) {
    let line = format!("{:>3} {}: {}", report.step, report.event, report.outcome);
    match report.outcome {
        StepOutcome::Moved(_) => println!("{} {}", "✓".green(), line),
        StepOutcome::Rejected(_) => println!("{} {}", "✗".red(), line),
        StepOutcome::Session { changed: false } => println!("  {}", line.dimmed()),
        _ => println!("  {}", line),
    }
}

pub fn stat(label: &str, value: &(impl Display + ?Sized)) {
    println!("{}: {}", format!("{label:>8}").green(), value);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for trees, ids and documents)
pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
