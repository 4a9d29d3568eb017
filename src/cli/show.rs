//! kanban show command implementation
//!
//! Loads the board data once and prints the grouped, ordered board.

use chrono::{DateTime, Utc};

use crate::board::{compute_board, Board, Grouping, Sorting};
use crate::error::Result;
use crate::loader;
use crate::output::{emit_success, format_board, OutputOptions};
use crate::session::Session;

use super::Context;

/// Per-run overrides; neither is persisted
pub struct ShowOptions {
    pub group: Option<String>,
    pub sort: Option<String>,
}

#[derive(serde::Serialize)]
struct ShowReport<'a> {
    source: String,
    generated_at: DateTime<Utc>,
    column_count: usize,
    ticket_count: usize,
    board: &'a Board,
}

pub fn run(context: Context, options: ShowOptions) -> Result<()> {
    // Reject bad overrides before touching the network.
    let group = options
        .group
        .as_deref()
        .map(str::parse::<Grouping>)
        .transpose()?;
    let sort = options
        .sort
        .as_deref()
        .map(str::parse::<Sorting>)
        .transpose()?;

    let mut session = Session::open(context.store.clone(), context.config.preferences.defaults());
    session.apply_loaded(loader::load_data(&context.source)?);

    let board = match (group, sort) {
        (None, None) => session.board(),
        (group, sort) => {
            let prefs = session.preferences();
            let dataset = session.dataset();
            compute_board(
                &dataset.tickets,
                &dataset.users,
                group.unwrap_or(prefs.grouping),
                sort.unwrap_or(prefs.sorting),
            )
        }
    };

    print_board(context.output, &context.source.origin(), &board)
}

fn print_board(output: OutputOptions, source: &str, board: &Board) -> Result<()> {
    if output.json {
        let report = ShowReport {
            source: source.to_string(),
            generated_at: Utc::now(),
            column_count: board.column_count(),
            ticket_count: board.ticket_count(),
            board,
        };
        return emit_success(output, "show", &report, None);
    }

    if !output.quiet {
        println!("{}", format_board(board));
    }
    Ok(())
}
