//! Sync engine tests
//!
//! The pre/post command cycle driven through the workspace command loop.

mod common;

use follow_mode::follow::{
    ResolverChoice, ResolverRef, SessionOptions, Slot, SyncOutcome,
};
use follow_mode::host::{Host, Location, NoticeLevel};
use follow_mode::messages::{Direction, Msg};
use follow_mode::{App, FollowConfig, ViewId};

use common::*;

const DIAGNOSTICS: &str = "diagnostics";

/// A 10-line source and a 3-line diagnostics listing resolved by `resolver`,
/// focus on the listing
fn diagnostics_app(resolver: impl FnOnce(ViewId) -> ResolverRef) -> (App, ViewId, ViewId) {
    let mut app = test_app(FollowConfig::default());
    let source = app.open_source("lib.rs", &source_text(10));
    app.follow.register(DIAGNOSTICS, resolver(source));
    let output = app.open_output("*compilation*", DIAGNOSTICS, "error a\nerror b\nerror c\n");
    app.workspace.focus_view(output);
    (app, source, output)
}

fn source_mark(app: &App) -> (Option<ViewId>, std::ops::Range<usize>) {
    let mark = app.follow.highlights().mark_at(Slot::Source);
    (mark.view(), mark.range())
}

fn output_mark(app: &App) -> (Option<ViewId>, std::ops::Range<usize>) {
    let mark = app.follow.highlights().mark_at(Slot::Output);
    (mark.view(), mark.range())
}

// ========================================================================
// Matched
// ========================================================================

#[test]
fn test_success_marks_both() {
    let (mut app, source, output) = diagnostics_app(|s| fixed_line(s, 2, 0));

    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));

    assert!(outcome.unwrap().is_matched());
    assert_eq!(source_mark(&app), (Some(source), line_range(&app, source, 2)));
    assert_eq!(output_mark(&app), (Some(output), line_range(&app, output, 1)));
    assert_eq!(app.workspace.focused_view(), Some(output));
    assert_eq!(app.workspace.regions().count(), 2);
}

#[test]
fn test_mid_line_location_marks_whole_line() {
    let (mut app, source, _) = diagnostics_app(|s| fixed_line(s, 4, 7));

    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down)).unwrap();

    let line = line_range(&app, source, 4);
    assert_eq!(
        outcome,
        SyncOutcome::Matched {
            source: Location::new(source, line.start + 7)
        }
    );
    assert_eq!(source_mark(&app).1, line);
}

#[test]
fn test_source_cursor_moves_to_resolved_location() {
    let (mut app, source, _) = diagnostics_app(|s| fixed_line(s, 6, 3));
    app.dispatch(Msg::GotoLine(2));
    let view = app.workspace.view(source).unwrap();
    assert_eq!(view.offset_to_cursor(view.cursor), (6, 3));
}

#[test]
fn test_cursor_at_first_character_leaves_output_unmarked() {
    let (mut app, source, output) = diagnostics_app(|s| fixed_line(s, 1, 0));
    app.dispatch(Msg::MoveCursor(Direction::Down));
    assert!(app.follow.highlights().mark_at(Slot::Output).is_attached());

    let outcome = app.dispatch(Msg::MoveCursorDocumentStart).unwrap();

    assert!(outcome.is_matched());
    assert_eq!(source_mark(&app).0, Some(source));
    assert!(!app.follow.highlights().mark_at(Slot::Output).is_attached());
    assert!(app.workspace.regions_in(output).is_empty());
}

#[test]
fn test_height_hint_resizes_output() {
    let mut app = test_app(FollowConfig::default());
    let source = app.open_source("lib.rs", &source_text(10));
    let output = app.workspace.open_output("*grep*", "grep", "a\nb\n");
    app.workspace.focus_view(output);
    app.follow
        .enable(
            &mut app.workspace,
            output,
            ResolverChoice::Override(fixed_line(source, 0, 0)),
            SessionOptions { height: Some(6) },
        )
        .unwrap();

    assert_eq!(app.workspace.view(output).unwrap().visible_lines, 25);
    app.dispatch(Msg::MoveCursor(Direction::Down));
    assert_eq!(app.workspace.view(output).unwrap().visible_lines, 6);
}

#[test]
fn test_configured_height_used_per_kind() {
    let mut config = FollowConfig::default();
    config.heights.insert(DIAGNOSTICS.into(), 4);
    let mut app = test_app(config);
    let source = app.open_source("lib.rs", &source_text(10));
    app.follow.register(DIAGNOSTICS, fixed_line(source, 0, 0));
    let output = app.open_output("*compilation*", DIAGNOSTICS, "a\nb\n");
    app.workspace.focus_view(output);

    app.dispatch(Msg::MoveCursor(Direction::Down));

    assert_eq!(app.workspace.view(output).unwrap().visible_lines, 4);
}

// ========================================================================
// Unmatched
// ========================================================================

#[test]
fn test_failure_marks_neither() {
    let (mut app, _, output) = diagnostics_app(|_| failing());

    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));

    assert_eq!(outcome, Some(SyncOutcome::Unmatched));
    assert!(app.follow.highlights().marks().all_detached());
    assert_eq!(app.workspace.regions().count(), 0);
    assert_eq!(app.workspace.focused_view(), Some(output));
    let notice = app.workspace.last_notice().unwrap();
    assert!(notice.transient);
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("No match"));
}

#[test]
fn test_failure_clears_previous_match() {
    let (mut app, source, output) = diagnostics_app(|s| fixed_line(s, 3, 0));
    app.dispatch(Msg::MoveCursor(Direction::Down));
    assert_eq!(app.workspace.regions().count(), 2);

    app.follow
        .enable(
            &mut app.workspace,
            output,
            ResolverChoice::Override(failing()),
            SessionOptions::default(),
        )
        .unwrap();
    app.dispatch(Msg::MoveCursor(Direction::Down));

    assert!(app.follow.highlights().marks().all_detached());
    assert!(app.workspace.regions_in(source).is_empty());
    assert!(app.workspace.regions_in(output).is_empty());
}

#[test]
fn test_partial_movement_is_undone() {
    let (mut app, source, output) = diagnostics_app(wandering);

    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));

    assert_eq!(outcome, Some(SyncOutcome::Unmatched));
    assert_eq!(app.workspace.focused_view(), Some(output));
    assert!(app.workspace.regions_in(source).is_empty());
    assert!(app
        .workspace
        .last_notice()
        .unwrap()
        .message
        .contains("gave up halfway"));
}

#[test]
fn test_panicking_resolver_is_a_failure() {
    let (mut app, _, output) = diagnostics_app(|_| panicking());

    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));

    assert_eq!(outcome, Some(SyncOutcome::Unmatched));
    assert_eq!(app.workspace.focused_view(), Some(output));
    assert!(app
        .workspace
        .last_notice()
        .unwrap()
        .message
        .contains("resolver exploded"));

    // the session keeps working afterwards
    assert_eq!(
        app.dispatch(Msg::MoveCursor(Direction::Down)),
        Some(SyncOutcome::Unmatched)
    );
}

#[test]
fn test_location_in_unknown_view_is_a_failure() {
    let (mut app, _, output) = diagnostics_app(|_| fixed_line(ViewId(999), 0, 0));
    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));
    assert_eq!(outcome, Some(SyncOutcome::Unmatched));
    assert_eq!(app.workspace.focused_view(), Some(output));
}

// ========================================================================
// Pre-command
// ========================================================================

#[test]
fn test_pre_command_always_clears() {
    let (mut app, _, output) = diagnostics_app(|s| fixed_line(s, 2, 0));
    app.dispatch(Msg::MoveCursor(Direction::Down));
    assert!(!app.follow.highlights().marks().all_detached());

    app.follow.pre_command(&mut app.workspace, output);

    assert!(app.follow.highlights().marks().all_detached());
    assert_eq!(app.workspace.regions().count(), 0);

    // and again from the already-cleared state
    app.follow.pre_command(&mut app.workspace, output);
    assert!(app.follow.highlights().marks().all_detached());
}

#[test]
fn test_post_without_pre_is_rejected() {
    let (mut app, source, output) = diagnostics_app(|s| fixed_line(s, 2, 0));
    app.dispatch(Msg::MoveCursor(Direction::Down));
    let before = app.follow.highlights().marks().clone();

    let outcome = app.follow.post_command(&mut app.workspace, output);

    assert_eq!(outcome, SyncOutcome::Rejected);
    assert_eq!(app.follow.highlights().marks(), &before);
    assert_eq!(app.workspace.regions_in(source), vec![line_range(&app, source, 2)]);
    let notice = app.workspace.last_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("without pre-command"));
}

// ========================================================================
// Missing resolver
// ========================================================================

#[test]
fn test_missing_resolver_reported_once() {
    let (mut app, _, _) = diagnostics_app(|s| fixed_line(s, 2, 0));
    app.follow.registry_mut().unregister(&DIAGNOSTICS.into());

    assert_eq!(
        app.dispatch(Msg::MoveCursor(Direction::Down)),
        Some(SyncOutcome::Unconfigured)
    );
    assert_eq!(
        app.dispatch(Msg::MoveCursor(Direction::Down)),
        Some(SyncOutcome::Unconfigured)
    );

    let reports = app
        .workspace
        .notices()
        .iter()
        .filter(|n| n.message.contains("No resolver"))
        .count();
    assert_eq!(reports, 1);
    assert!(app.follow.highlights().marks().all_detached());
}

// ========================================================================
// Toggle
// ========================================================================

#[test]
fn test_toggle_freezes_marks() {
    let (mut app, _, output) = diagnostics_app(|s| fixed_line(s, 2, 0));
    app.dispatch(Msg::MoveCursor(Direction::Down));
    let frozen = app.follow.highlights().marks().clone();

    assert!(!app.follow.toggle(&mut app.workspace, output));
    let stats = app.workspace.render_stats();

    for _ in 0..2 {
        assert_eq!(
            app.dispatch(Msg::MoveCursor(Direction::Down)),
            Some(SyncOutcome::Disabled)
        );
    }

    assert_eq!(app.workspace.render_stats(), stats);
    assert_eq!(app.follow.highlights().marks(), &frozen);
}

#[test]
fn test_toggle_back_on_resumes() {
    let (mut app, source, output) = diagnostics_app(|s| fixed_line(s, 5, 0));
    app.follow.toggle(&mut app.workspace, output);
    app.dispatch(Msg::MoveCursor(Direction::Down));
    assert!(app.follow.highlights().marks().all_detached());

    assert!(app.follow.toggle(&mut app.workspace, output));
    let outcome = app.dispatch(Msg::MoveCursor(Direction::Down));

    assert!(outcome.unwrap().is_matched());
    assert_eq!(source_mark(&app), (Some(source), line_range(&app, source, 5)));
}
