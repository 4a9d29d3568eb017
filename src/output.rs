//! Shared output formatting for kanban CLI commands.

use serde::Serialize;

use crate::board::{Board, Card, Column, Grouping};
use crate::error::Result;
use crate::model;

pub const SCHEMA_VERSION: &str = "kanban.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// Plain-text board: one block per column, one line per card.
pub fn format_board(board: &Board) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Board: grouped by {}, ordered by {} ({} columns, {} tickets)",
        board.grouping.label(),
        board.sorting.label(),
        board.column_count(),
        board.ticket_count()
    ));
    if board.columns.is_empty() {
        lines.push(String::new());
        lines.push("(no tickets)".to_string());
    }
    for column in &board.columns {
        lines.push(String::new());
        lines.push(format_column_header(column, board.grouping));
        for card in &column.cards {
            lines.push(format_card_line(card));
        }
    }
    lines.join("\n")
}

pub fn format_column_header(column: &Column, grouping: Grouping) -> String {
    format!(
        "{} {} ({})",
        column_glyph(&column.key, grouping),
        column.title,
        column.count
    )
}

fn format_card_line(card: &Card) -> String {
    let avatar = card
        .initial
        .map(|ch| format!("[{ch}]"))
        .unwrap_or_else(|| "[ ]".to_string());
    let mut line = format!(
        "  {} {:<8} {} {}",
        priority_glyph(card.priority),
        card.id,
        avatar,
        card.title
    );
    for tag in &card.tags {
        line.push_str(&format!("  \u{25cf} {tag}"));
    }
    line
}

/// Column marker: status or priority glyph, generic marker for users.
pub fn column_glyph(key: &str, grouping: Grouping) -> &'static str {
    match grouping {
        Grouping::Status => status_glyph(key),
        Grouping::Priority => key
            .trim()
            .parse::<i64>()
            .map(priority_glyph)
            .unwrap_or("?"),
        Grouping::User => "@",
    }
}

pub fn status_glyph(status: &str) -> &'static str {
    match status {
        "Backlog" => "\u{25cc}",
        "Todo" => "\u{25cb}",
        "In progress" => "\u{25d0}",
        "Done" => "\u{25cf}",
        "Cancelled" => "\u{2297}",
        _ => "?",
    }
}

pub fn priority_glyph(priority: i64) -> &'static str {
    match priority {
        0 => "---",
        1 => "\u{2582}  ",
        2 => "\u{2582}\u{2584} ",
        3 => "\u{2582}\u{2584}\u{2586}",
        4 => "!!!",
        _ => " ? ",
    }
}

/// Priority name for a card, "Unknown" when out of range.
pub fn priority_label(priority: i64) -> &'static str {
    model::priority_name(priority).unwrap_or(crate::board::UNKNOWN_PRIORITY_TITLE)
}

/// Global flags whose value is a separate argument.
const VALUE_FLAGS: [&str; 4] = ["--config", "--endpoint", "--data", "--prefs"];

pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    let mut command = None;
    let mut subcommand = None;

    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        command = Some(arg);
        break;
    }

    let command = match command {
        Some(cmd) => cmd,
        None => return "kanban".to_string(),
    };

    if command == "prefs" {
        for arg in args.by_ref() {
            if arg.starts_with('-') {
                continue;
            }
            subcommand = Some(arg);
            break;
        }
    }

    if let Some(sub) = subcommand {
        format!("{command} {sub}")
    } else {
        command
    }
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::Fetch { .. } | Error::HttpStatus { .. } => {
            vec!["check endpoint.url in kanban.toml or pass --data <file>".to_string()]
        }
        Error::Decode { .. } => vec!["verify the source returns { tickets, users }".to_string()],
        Error::InvalidConfig(_) => vec!["fix kanban.toml then retry".to_string()],
        Error::LockFailed(_) => vec!["another kanban process is saving preferences; retry".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}
