//! Logging setup and mark snapshots for diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=follow_mode::follow=trace` - every mark attach/detach
//!
//! # Log Files
//!
//! Logs are written to `~/.config/follow-mode/logs/follow-mode.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::follow::{MarkSet, Slot};
use crate::host::ViewId;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`); the file layer always logs at debug.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "follow-mode.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of both mark slots for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSnapshot {
    pub slots: [Option<(ViewId, usize, usize)>; 2],
}

impl MarkSnapshot {
    pub fn from_marks(marks: &MarkSet) -> Self {
        let slot = |s: Slot| {
            marks
                .get(s)
                .attachment
                .as_ref()
                .map(|a| (a.view, a.range.start, a.range.end))
        };
        Self {
            slots: [slot(Slot::Source), slot(Slot::Output)],
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &MarkSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        for (slot, (before, after)) in Slot::ALL
            .iter()
            .zip(self.slots.iter().zip(other.slots.iter()))
        {
            if before == after {
                continue;
            }
            let describe = |s: &Option<(ViewId, usize, usize)>| match s {
                Some((view, begin, end)) => format!("{} [{},{})", view, begin, end),
                None => "detached".to_string(),
            };
            changes.push(format!(
                "{:?}: {} → {}",
                slot,
                describe(before),
                describe(after)
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_snapshots_have_no_diff() {
        let snap = MarkSnapshot::from_marks(&MarkSet::default());
        assert_eq!(snap.diff(&snap.clone()), None);
    }

    #[test]
    fn test_diff_names_changed_slot() {
        let before = MarkSnapshot { slots: [None, None] };
        let after = MarkSnapshot {
            slots: [Some((ViewId(2), 10, 18)), None],
        };
        let diff = before.diff(&after).unwrap();
        assert!(diff.contains("Source"));
        assert!(diff.contains("view#2 [10,18)"));
        assert!(!diff.contains("Output"));
    }
}
