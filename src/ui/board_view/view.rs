use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::board::{Card, Column, Grouping};
use crate::output::{column_glyph, priority_glyph, priority_label, status_glyph};

use super::app::{AppState, StatusKind};
use super::picker::{DisplayPanel, OptionList, PanelField};

/// Rows one card occupies, including the spacer.
pub(crate) const CARD_HEIGHT: u16 = 4;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_COLUMN: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_SELECTED: Color = Color::Rgb(180, 156, 92);

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);
    let header = chunks[0];
    let main = chunks[1];
    let footer = chunks[2];

    render_header(frame, app, header);
    render_board(frame, app, main);
    render_footer(frame, app, footer);

    if let Some(panel) = app.display.as_ref() {
        render_display_panel(frame, area, panel);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let arrow = if app.display.is_some() { "\u{25b2}" } else { "\u{25bc}" };
    let button = Span::styled(
        format!(" Display {arrow} "),
        Style::default()
            .fg(COLOR_TEXT)
            .bg(COLOR_BG_MUTED)
            .add_modifier(Modifier::BOLD),
    );
    let summary = Span::styled(
        format!(
            "  {} / {}",
            app.grouping().label(),
            app.sorting().label()
        ),
        Style::default().fg(COLOR_MUTED),
    );
    let widget = Paragraph::new(Line::from(vec![button, summary])).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_board(frame: &mut Frame, app: &AppState, area: Rect) {
    if app.board.columns.is_empty() {
        let message = if app.loading {
            "loading tickets..."
        } else {
            "no tickets"
        };
        let widget = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED_DARK),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(widget, area);
        return;
    }

    let capacity = app.visible_column_capacity(area.width);
    let start = app.column_window_start(capacity);
    let end = (start + capacity).min(app.board.column_count());
    let visible = &app.board.columns[start..end];

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|_| Constraint::Ratio(1, visible.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (offset, (column, slot)) in visible.iter().zip(slots.iter()).enumerate() {
        let idx = start + offset;
        let selected_card = if idx == app.selected_column {
            Some(app.selected_card)
        } else {
            None
        };
        render_column(frame, column, app.grouping(), selected_card, *slot);
    }
}

fn render_column(
    frame: &mut Frame,
    column: &Column,
    grouping: Grouping,
    selected_card: Option<usize>,
    area: Rect,
) {
    let border = if selected_card.is_some() {
        COLOR_BORDER_SELECTED
    } else {
        COLOR_BORDER_COLUMN
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", column_glyph(&column.key, grouping)),
            column_glyph_style(&column.key, grouping),
        ),
        Span::styled(
            column.title.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", column.count),
            Style::default().fg(COLOR_MUTED),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2);
    let per_page = (inner_height / CARD_HEIGHT).max(1) as usize;
    let (start, end) = card_window(column.cards.len(), selected_card, per_page);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, card) in column.cards[start..end].iter().enumerate() {
        let selected = selected_card == Some(start + idx);
        lines.extend(card_lines(card, selected, inner_width));
    }

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);
}

fn card_lines(card: &Card, selected: bool, width: usize) -> Vec<Line<'static>> {
    let marker = if selected { "\u{258c}" } else { " " };
    let marker_style = Style::default().fg(COLOR_WARNING);
    let avatar = card
        .initial
        .map(|ch| format!("({ch})"))
        .unwrap_or_default();
    let id_width = width.saturating_sub(avatar.chars().count() + 2);

    let mut title_style = Style::default().fg(COLOR_TEXT);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    let header = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::styled(pad_text(&card.id, id_width), id_style()),
        Span::styled(
            avatar,
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]);
    let title = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::styled(
            truncate_text(&card.title, width.saturating_sub(2)),
            title_style,
        ),
    ]);

    let mut footer = vec![
        Span::styled(marker, marker_style),
        Span::styled(
            priority_glyph(card.priority).to_string(),
            Style::default().fg(priority_color(card.priority)),
        ),
        Span::styled(
            format!(" {}", status_glyph(&card.status)),
            Style::default().fg(status_color(&card.status)),
        ),
    ];
    let mut used = 6;
    for tag in &card.tags {
        let text = format!("  \u{25cf} {tag}");
        let len = text.chars().count();
        if used + len > width {
            footer.push(Span::styled(" ...", Style::default().fg(COLOR_MUTED_DARK)));
            break;
        }
        used += len;
        footer.push(Span::styled(text, Style::default().fg(COLOR_MUTED)));
    }

    vec![header, title, Line::from(footer), Line::from("")]
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let mut summary = app.board_summary();
    if let Some(card) = app.selected_card() {
        summary.push_str(&format!(
            "  |  {} {}",
            card.id,
            priority_label(card.priority)
        ));
        if let Some(name) = card.assignee.as_ref() {
            summary.push_str(&format!(" @{name}"));
        }
    }
    let counts_line = Line::from(Span::styled(summary, Style::default().fg(COLOR_ACCENT)));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_COLUMN)),
        );
    frame.render_widget(widget, area);
}

fn render_display_panel(frame: &mut Frame, area: Rect, panel: &DisplayPanel) {
    let width = 34u16.min(area.width.saturating_sub(2));
    let rows = (panel.grouping().options().len() + panel.ordering().options().len()) as u16;
    let height = (rows + 7).min(area.height.saturating_sub(2));
    // Drops down under the Display button, like a menu.
    let modal = Rect::new(area.x + 1, area.y + 1, width, height);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    push_option_section(
        &mut lines,
        "Grouping",
        panel.focus() == PanelField::Grouping,
        panel.grouping(),
        |value| value.label(),
    );
    lines.push(Line::from(""));
    push_option_section(
        &mut lines,
        "Ordering",
        panel.focus() == PanelField::Ordering,
        panel.ordering(),
        |value| value.label(),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc close",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_SELECTED))
            .title("Display"),
    );
    frame.render_widget(widget, modal);
}

fn push_option_section<T: Copy + PartialEq>(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    focused: bool,
    list: &OptionList<T>,
    label: impl Fn(T) -> &'static str,
) {
    let title_style = if focused {
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(COLOR_MUTED)
    };
    lines.push(Line::from(Span::styled(title.to_string(), title_style)));
    for (idx, option) in list.options().iter().enumerate() {
        let mut style = Style::default().fg(COLOR_TEXT);
        if idx == list.selected_index() {
            style = style.add_modifier(Modifier::BOLD);
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
        }
        lines.push(Line::from(Span::styled(
            format!("  {} {}", idx + 1, label(*option)),
            style,
        )));
    }
}

/// Slice of cards to show so the selected one is visible.
fn card_window(total: usize, selected: Option<usize>, per_page: usize) -> (usize, usize) {
    if total <= per_page {
        return (0, total);
    }
    let selected = selected.unwrap_or(0).min(total - 1);
    let start = if selected >= per_page {
        selected + 1 - per_page
    } else {
        0
    };
    (start, (start + per_page).min(total))
}

fn column_glyph_style(key: &str, grouping: Grouping) -> Style {
    let fg = match grouping {
        Grouping::Status => status_color(key),
        Grouping::Priority => key
            .trim()
            .parse::<i64>()
            .map(priority_color)
            .unwrap_or(COLOR_MUTED),
        Grouping::User => COLOR_ACCENT,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

fn status_color(status: &str) -> Color {
    match status {
        "Backlog" => COLOR_MUTED,
        "Todo" => COLOR_TEXT,
        "In progress" => COLOR_WARNING,
        "Done" => Color::Rgb(98, 114, 214),
        "Cancelled" => COLOR_MUTED_DARK,
        _ => COLOR_INFO,
    }
}

fn priority_color(priority: i64) -> Color {
    match priority {
        4 => Color::Rgb(255, 87, 87),
        3 => Color::Rgb(255, 147, 112),
        2 => COLOR_WARNING,
        1 => COLOR_SUCCESS,
        0 => COLOR_MUTED_DARK,
        _ => COLOR_INFO,
    }
}

fn pad_text(value: &str, width: usize) -> String {
    let text = truncate_text(value, width);
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

fn id_style() -> Style {
    Style::default()
        .fg(COLOR_MUTED)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_window_keeps_selection_visible() {
        assert_eq!(card_window(3, Some(2), 5), (0, 3));
        assert_eq!(card_window(10, Some(0), 4), (0, 4));
        assert_eq!(card_window(10, Some(6), 4), (3, 7));
        assert_eq!(card_window(10, Some(9), 4), (6, 10));
        assert_eq!(card_window(10, None, 4), (0, 4));
    }

    #[test]
    fn truncate_marks_cut_titles() {
        assert_eq!(truncate_text("Add multi-language support", 10), "Add mul...");
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn card_lines_include_avatar_and_tags() {
        let card = Card {
            id: "CAM-1".to_string(),
            title: "Update user profile page UI".to_string(),
            priority: 4,
            status: "Todo".to_string(),
            user_id: "usr-1".to_string(),
            assignee: Some("Anoop sharma".to_string()),
            initial: Some('A'),
            tags: vec!["Feature request".to_string()],
        };
        let lines = card_lines(&card, true, 40);
        assert_eq!(lines.len(), CARD_HEIGHT as usize);
        let header: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.contains("CAM-1"));
        assert!(header.ends_with("(A)"));
        let footer: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(footer.contains("Feature request"));
    }
}
