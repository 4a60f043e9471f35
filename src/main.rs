use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use follow_mode::follow::{
    ResolverCatalog, ResolverChoice, ResolverRegistry, SessionOptions, Slot, SyncOutcome,
};
use follow_mode::host::{Host, Notice, ViewId, ViewKind};
use follow_mode::keymap::parse_key_string;
use follow_mode::{App, FollowConfig, FollowController, Msg, Workspace};

mod cli;
mod grep_line;

use cli::{CliArgs, ReplCommand};
use grep_line::GrepLineResolver;

/// Name under which the grep resolver is offered to configuration
const GREP_LINE: &str = "grep-line";

#[derive(Serialize)]
struct MarkReport {
    line: usize,
    begin: usize,
    end: usize,
    text: String,
}

#[derive(Serialize)]
struct Report {
    outcome: Option<SyncOutcome>,
    cursor_line: usize,
    source: Option<MarkReport>,
    output: Option<MarkReport>,
    notices: Vec<Notice>,
}

fn mark_report(app: &App, slot: Slot) -> Option<MarkReport> {
    let mark = app.follow.highlights().mark_at(slot);
    let view = app.workspace.view(mark.view()?)?;
    let range = mark.range();
    let line = view.offset_to_cursor(range.start).0;
    Some(MarkReport {
        line: line + 1,
        begin: range.start,
        end: range.end,
        text: view.line_text(line),
    })
}

/// Notices are drained, so each report only shows what the last command raised
fn report(app: &mut App, output: ViewId, outcome: Option<SyncOutcome>) -> Report {
    let cursor_line = app
        .workspace
        .view(output)
        .map(|v| v.cursor_line() + 1)
        .unwrap_or(0);
    let source = mark_report(app, Slot::Source);
    let output = mark_report(app, Slot::Output);
    Report {
        outcome,
        cursor_line,
        source,
        output,
        notices: app.workspace.take_notices(),
    }
}

fn print_report(out: &mut impl Write, report: &Report, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
        return Ok(());
    }

    write!(out, "listing:{}", report.cursor_line)?;
    match &report.source {
        Some(m) => write!(out, "  source:{} [{},{}) {}", m.line, m.begin, m.end, m.text)?,
        None => write!(out, "  source:-")?,
    }
    if let Some(m) = &report.output {
        write!(out, "  item:[{},{})", m.begin, m.end)?;
    }
    writeln!(out)?;
    for notice in &report.notices {
        writeln!(out, "  ! {}", notice.message)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    follow_mode::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => FollowConfig::load_from(path)?,
        None => FollowConfig::load(),
    };

    let source_text = std::fs::read_to_string(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;
    let listing_text = std::fs::read_to_string(&args.listing)
        .with_context(|| format!("reading {}", args.listing.display()))?;

    let mut workspace = Workspace::new();
    let source = workspace.open(&args.source.display().to_string(), &source_text);

    let mut catalog = ResolverCatalog::new();
    catalog.insert(GREP_LINE.to_string(), Arc::new(GrepLineResolver::new(source)));

    let kind = ViewKind::new(args.kind.as_str());
    let mut registry = ResolverRegistry::new();
    registry.bind_named(&config.resolvers, &catalog);
    if !registry.contains(&kind) {
        registry.register(kind.clone(), catalog[GREP_LINE].clone());
    }

    let mut app = App::new(workspace, FollowController::new(config, registry));
    let output = app.open_output(&args.listing.display().to_string(), kind, &listing_text);
    app.workspace.focus_view(output);
    if args.height.is_some() {
        app.follow.enable(
            &mut app.workspace,
            output,
            ResolverChoice::ViewKind,
            SessionOptions {
                height: args.height,
            },
        )?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };

        let outcome = match command {
            ReplCommand::Quit => break,
            ReplCommand::Goto(n) => app.dispatch(Msg::GotoLine(n)),
            ReplCommand::Key(key) => match parse_key_string(&key) {
                Ok(keystroke) => app.handle_key(keystroke),
                Err(e) => {
                    writeln!(out, "  ! {}", e)?;
                    continue;
                }
            },
        };
        print_report(&mut out, &report(&mut app, output, outcome), args.json)?;
    }

    Ok(())
}
