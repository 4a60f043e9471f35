//! Command-line argument parsing for the demo
//!
//! ```text
//! follow-mode src/lib.rs hits.txt --kind occurrences --height 8
//! ```
//!
//! The listing is grep-style output (`LINE:text` or `path:LINE:text`).
//! Commands are read from stdin, one per line.

use std::path::PathBuf;

use clap::Parser;

/// Follow a grep-style listing through a source file
#[derive(Parser, Debug)]
#[command(name = "follow-mode", version, about = "Follow listing items into a source file")]
pub struct CliArgs {
    /// Source file the listing refers to
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Listing with one `LINE:text` item per line
    #[arg(value_name = "LISTING")]
    pub listing: PathBuf,

    /// View kind of the listing
    #[arg(short, long, default_value = "occurrences")]
    pub kind: String,

    /// Resize the listing to N lines after each match
    #[arg(long, value_name = "N")]
    pub height: Option<usize>,

    /// Config file to use instead of ~/.config/follow-mode/config.yaml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print one JSON report per command
    #[arg(long)]
    pub json: bool,
}

/// A line typed on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    /// `g N`: go to listing line N (1-indexed)
    Goto(usize),
    /// Anything else is a key string ("j", "down", "f", "ctrl+shift+f")
    Key(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line == "q" || line == "quit" {
            return Some(ReplCommand::Quit);
        }
        if let Some(n) = line.strip_prefix("g ") {
            return n
                .trim()
                .parse::<usize>()
                .ok()
                .map(|n| ReplCommand::Goto(n.saturating_sub(1)));
        }
        Some(ReplCommand::Key(line.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goto_is_zero_indexed() {
        assert_eq!(ReplCommand::parse("g 3"), Some(ReplCommand::Goto(2)));
        assert_eq!(ReplCommand::parse("g x"), None);
    }

    #[test]
    fn test_parse_keys_and_quit() {
        assert_eq!(ReplCommand::parse("  q "), Some(ReplCommand::Quit));
        assert_eq!(ReplCommand::parse("j"), Some(ReplCommand::Key("j".into())));
        assert_eq!(ReplCommand::parse(""), None);
    }

    #[test]
    fn test_args_defaults() {
        let args = CliArgs::parse_from(["follow-mode", "a.rs", "hits.txt"]);
        assert_eq!(args.kind, "occurrences");
        assert_eq!(args.height, None);
        assert!(!args.json);
    }
}
