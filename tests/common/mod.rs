//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;
use std::sync::Arc;

use follow_mode::follow::{ResolveError, ResolverRef, ResolverRegistry};
use follow_mode::host::{Host, Location, ViewId};
use follow_mode::{App, FollowConfig, FollowController, Workspace};

pub const OCCURRENCES: &str = "occurrences";

/// "source line 1\nsource line 2\n..." with `lines` lines
pub fn source_text(lines: usize) -> String {
    (1..=lines).map(|n| format!("source line {}\n", n)).collect()
}

/// Three hits; hit N refers to source line 10*N
pub fn hits_text() -> String {
    "hit one\nhit two\nhit three\n".to_string()
}

/// An app with no resolvers registered and the given config
pub fn test_app(config: FollowConfig) -> App {
    App::new(
        Workspace::new(),
        FollowController::new(config, ResolverRegistry::new()),
    )
}

/// An app with a 40-line source view and an occurrences listing, where the
/// listing's kind resolves with [`ten_times`]. Focus is on the listing.
pub fn occurrences_app() -> (App, ViewId, ViewId) {
    let mut app = test_app(FollowConfig::default());
    let source = app.open_source("main.rs", &source_text(40));
    app.follow.register(OCCURRENCES, ten_times(source));
    let output = app.open_output("*occur*", OCCURRENCES, &hits_text());
    app.workspace.focus_view(output);
    (app, source, output)
}

/// Output line N (1-indexed) -> start of source line 10*N; moves focus into the source
pub fn ten_times(source: ViewId) -> ResolverRef {
    Arc::new(
        move |host: &mut dyn Host, at: Location| -> Result<Location, ResolveError> {
            let line = host.line_of(at.view, at.offset).ok_or_else(ResolveError::no_item)? + 1;
            let offset = host
                .line_offset(source, line * 10 - 1)
                .ok_or_else(|| ResolveError::new("past the end"))?;
            host.focus_view(source);
            Ok(Location::new(source, offset))
        },
    )
}

/// Always lands on `line` (0-indexed) of `source`, at `column`
pub fn fixed_line(source: ViewId, line: usize, column: usize) -> ResolverRef {
    Arc::new(
        move |host: &mut dyn Host, _at: Location| -> Result<Location, ResolveError> {
            let start = host
                .line_offset(source, line)
                .ok_or_else(|| ResolveError::new("no such line"))?;
            Ok(Location::new(source, start + column))
        },
    )
}

/// Always fails without touching anything
pub fn failing() -> ResolverRef {
    Arc::new(
        |_: &mut dyn Host, _: Location| -> Result<Location, ResolveError> {
            Err(ResolveError::no_item())
        },
    )
}

/// Moves focus and the source cursor, then fails
pub fn wandering(source: ViewId) -> ResolverRef {
    Arc::new(
        move |host: &mut dyn Host, _: Location| -> Result<Location, ResolveError> {
            host.focus_view(source);
            host.set_cursor(source, 5);
            Err(ResolveError::new("gave up halfway"))
        },
    )
}

/// Panics instead of returning
pub fn panicking() -> ResolverRef {
    Arc::new(
        |_: &mut dyn Host, _: Location| -> Result<Location, ResolveError> {
            panic!("resolver exploded")
        },
    )
}

/// Char range of `line` (0-indexed) in `view`, without the newline
pub fn line_range(app: &App, view: ViewId, line: usize) -> Range<usize> {
    app.workspace.view(view).unwrap().line_char_range(line)
}

/// Put the cursor of `view` at the start of `line` (0-indexed) without running a command
pub fn place_cursor(app: &mut App, view: ViewId, line: usize) {
    app.workspace.view_mut(view).unwrap().goto_line(line);
}
