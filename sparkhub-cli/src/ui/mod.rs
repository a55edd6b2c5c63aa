//! Terminal output for the sparkhub CLI
//!
//! Data (fields, secrets, invoices, JSON) goes to stdout so it can be piped.
//! Notices and progress go to stderr.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const LABEL_WIDTH: usize = 14;

#[derive(Clone, Copy)]
enum Tone {
    Done,
    Note,
    Caution,
    Failure,
}

impl Tone {
    fn marker(self) -> ColoredString {
        match self {
            Tone::Done => "✓".green().bold(),
            Tone::Note => "·".blue().bold(),
            Tone::Caution => "!".yellow().bold(),
            Tone::Failure => "✗".red().bold(),
        }
    }
}

fn notice(tone: Tone, message: &str) {
    eprintln!("{} {}", tone.marker(), message);
}

pub fn success(message: &str) {
    notice(Tone::Done, message);
}

pub fn info(message: &str) {
    notice(Tone::Note, message);
}

pub fn warning(message: &str) {
    notice(Tone::Caution, message);
}

pub fn error(message: &str) {
    notice(Tone::Failure, message);
}

/// Section title on stdout
pub fn header(text: &str) {
    println!("\n{}", text.bold());
}

/// Aligned `label  value` line
pub fn field(label: &str, value: &str) {
    let label = format!("{:<width$}", label, width = LABEL_WIDTH);
    println!("  {} {}", label.cyan(), value);
}

/// Print an unsealed secret between rules so it is easy to copy.
pub fn reveal_secret(secret: &str) {
    let rule = "─".repeat(secret.chars().count().clamp(20, 72)).dimmed();
    println!("{}\n{}\n{}", rule, secret, rule);
}

/// Print a BOLT11 invoice on its own line.
pub fn invoice(invoice: &str) {
    println!("\n{}", invoice);
}

/// Pretty JSON on stdout
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}

/// Spinner on stderr for slow steps (scrypt, network). Hidden when stderr
/// is not a terminal.
pub fn busy(message: &str) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["◐", "◓", "◑", "◒", "●"])
        .template("{spinner:.cyan} {msg}")
    {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Whether a human can answer prompts
pub fn is_interactive() -> bool {
    Term::stderr().is_term() && Term::stdout().is_term()
}

/// Ask before a destructive step. `assume_yes` skips the prompt; without a
/// terminal the step is refused.
pub fn confirm_destructive(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !is_interactive() {
        anyhow::bail!("{} (pass --yes to confirm non-interactively)", prompt);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Prompt for a seed phrase. Whitespace runs are collapsed to single spaces.
pub fn seed_input(prompt: &str) -> anyhow::Result<String> {
    let raw: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .validate_with(|text: &String| {
            if text.trim().is_empty() {
                Err("seed phrase cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(normalize_seed(&raw))
}

/// Collapse whitespace so pasted phrases seal identically.
pub fn normalize_seed(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_seed() {
        assert_eq!(normalize_seed("  abandon\tability \n able "), "abandon ability able");
        assert_eq!(normalize_seed("   "), "");
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(confirm_destructive("Delete?", true).unwrap());
    }
}
