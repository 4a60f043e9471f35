//! Sync engine - the pre/post command callbacks
//!
//! Pre-command clears both marks. Post-command asks the session's resolver
//! where the item under the cursor lives, marks the source line and the
//! output line, and keeps focus on the output view. A failed resolution
//! leaves both marks cleared, so the visible marks always belong to the last
//! command that resolved, or there are none.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use super::error::{FollowError, ResolveError};
use super::highlight::{HighlightManager, Slot};
use super::registry::Resolver;
use super::session::Session;
use crate::host::{Host, Location, Notice, ViewId};
use crate::tracing::MarkSnapshot;

/// Where a session is in the command cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No command in flight
    #[default]
    Idle,
    /// Between the pre- and post-command callbacks
    Resolving,
}

/// Result of one post-command callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    /// Both marks placed; `source` is the resolved location
    Matched { source: Location },
    /// The resolver found nothing; marks cleared
    Unmatched,
    /// Synchronization is toggled off; marks untouched
    Disabled,
    /// No resolver is in effect for the view
    Unconfigured,
    /// The callback was rejected (out of sequence, unknown view)
    Rejected,
}

impl SyncOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, SyncOutcome::Matched { .. })
    }
}

/// Drives the highlight manager from the host's command loop
#[derive(Debug, Default)]
pub struct SyncEngine {
    highlights: HighlightManager,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlights(&self) -> &HighlightManager {
        &self.highlights
    }

    pub(crate) fn highlights_mut(&mut self) -> &mut HighlightManager {
        &mut self.highlights
    }

    /// Runs before every command in a followed view
    pub fn pre_command(&mut self, host: &mut dyn Host, session: &mut Session, enabled: bool) {
        session.set_phase(Phase::Resolving);
        if !enabled {
            return;
        }
        self.highlights.unmark_all(host);
    }

    /// Runs after every command in a followed view
    pub fn post_command(
        &mut self,
        host: &mut dyn Host,
        session: &mut Session,
        resolver: Option<&dyn Resolver>,
        enabled: bool,
    ) -> SyncOutcome {
        let phase = session.phase();
        session.set_phase(Phase::Idle);

        if !enabled {
            return SyncOutcome::Disabled;
        }

        let output = session.view();
        if phase != Phase::Resolving {
            tracing::warn!(%output, "post-command without pre-command");
            report(host, &FollowError::OutOfSequence { view: output });
            return SyncOutcome::Rejected;
        }

        let Some(resolver) = resolver else {
            if session.report_unconfigured_once() {
                let err = FollowError::NoResolver {
                    view: output,
                    kind: session.kind().cloned(),
                };
                tracing::warn!("{}", err);
                report(host, &err);
            }
            return SyncOutcome::Unconfigured;
        };

        let Some(cursor) = host.cursor(output) else {
            report(host, &FollowError::UnknownView(output));
            return SyncOutcome::Rejected;
        };

        let before = MarkSnapshot::from_marks(self.highlights.marks());
        let at = Location::new(output, cursor);
        let outcome = match invoke(resolver, host, at) {
            Ok(source) => self.matched(host, session, source),
            Err(e) => self.unmatched(host, output, e.into()),
        };

        let after = MarkSnapshot::from_marks(self.highlights.marks());
        if let Some(diff) = before.diff(&after) {
            tracing::trace!(%output, "marks: {}", diff);
        }
        outcome
    }

    fn matched(&mut self, host: &mut dyn Host, session: &Session, source: Location) -> SyncOutcome {
        let output = session.view();

        if host.cursor(source.view).is_none() {
            return self.unmatched(host, output, FollowError::UnknownView(source.view));
        }
        host.set_cursor(source.view, source.offset);
        let source_cursor = host.cursor(source.view).unwrap_or(source.offset);
        let Some(source_line) = host.line_range(source.view, source_cursor) else {
            return self.unmatched(host, output, FollowError::UnknownView(source.view));
        };
        if let Err(e) = self.highlights.mark(
            host,
            Slot::Source,
            source.view,
            source_line.start,
            source_line.end,
        ) {
            return self.unmatched(host, output, e);
        }

        host.focus_view(output);

        // cursor at the very start means no item is selected yet
        let output_cursor = host.cursor(output).unwrap_or(0);
        let output_line = if output_cursor > 0 {
            host.line_range(output, output_cursor)
        } else {
            None
        };
        match output_line {
            Some(line) => {
                if let Err(e) =
                    self.highlights
                        .mark(host, Slot::Output, output, line.start, line.end)
                {
                    return self.unmatched(host, output, e);
                }
            }
            None => {
                self.highlights.unmark(host, Slot::Output);
            }
        }

        if let Some(lines) = session.height() {
            host.set_visible_lines(output, lines);
        }
        self.highlights.set_owner(Some(output));

        let source = Location::new(source.view, source_cursor);
        tracing::debug!(%output, source_view = %source.view, offset = source.offset, "matched");
        SyncOutcome::Matched { source }
    }

    fn unmatched(
        &mut self,
        host: &mut dyn Host,
        output: ViewId,
        err: FollowError,
    ) -> SyncOutcome {
        tracing::debug!(%output, "unmatched: {}", err);
        host.focus_view(output);
        self.highlights.unmark_all(host);
        host.notify(Notice::warning(err.to_string()).transient());
        SyncOutcome::Unmatched
    }
}

fn report(host: &mut dyn Host, err: &FollowError) {
    host.notify(Notice::error(err.to_string()));
}

/// Call the resolver, turning a panic into a resolution failure
fn invoke(
    resolver: &dyn Resolver,
    host: &mut dyn Host,
    at: Location,
) -> Result<Location, ResolveError> {
    match panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve(host, at))) {
        Ok(result) => result,
        Err(payload) => Err(ResolveError::new(format!(
            "resolver panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
