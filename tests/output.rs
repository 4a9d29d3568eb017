use kanban::board::{compute_board, Grouping, Sorting};
use kanban::model::{Ticket, User};
use kanban::output::{
    column_glyph, format_board, format_human, priority_label, HumanOutput,
};

fn ticket(id: &str, title: &str, status: &str, priority: i64, user_id: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        title: title.to_string(),
        priority,
        status: status.to_string(),
        user_id: user_id.to_string(),
        tag: vec!["Feature Request".to_string()],
    }
}

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("kanban prefs: current");
    human.push_summary("grouping", "user");
    human.push_warning("stored sorting 'created' is not recognised; ordering by title");
    human.push_next_step("kanban prefs reset");

    let rendered = format_human(&human);
    assert!(rendered.starts_with("kanban prefs: current"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- grouping: user"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- stored sorting 'created' is not recognised"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- kanban prefs reset"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("kanban prefs: current");
    let rendered = format_human(&human);
    assert_eq!(rendered, "kanban prefs: current");
}

#[test]
fn format_board_lists_columns_and_cards() {
    let tickets = vec![
        ticket("CAM-1", "Update profile page", "Todo", 4, "usr-1"),
        ticket("CAM-2", "Add language support", "In progress", 3, "usr-9"),
    ];
    let users = vec![User {
        id: "usr-1".to_string(),
        name: "Anoop sharma".to_string(),
        available: false,
    }];
    let board = compute_board(&tickets, &users, Grouping::Status, Sorting::Priority);
    let rendered = format_board(&board);

    assert!(rendered.starts_with("Board: grouped by Status, ordered by Priority (2 columns, 2 tickets)"));
    assert!(rendered.contains("In progress (1)"));
    assert!(rendered.contains("Todo (1)"));
    assert!(rendered.contains("CAM-1"));
    assert!(rendered.contains("[A] Update profile page"));
    assert!(rendered.contains("[ ] Add language support"));
    assert!(rendered.contains("\u{25cf} Feature Request"));
}

#[test]
fn column_glyph_follows_grouping() {
    assert_eq!(column_glyph("4", Grouping::Priority), "!!!");
    assert_eq!(column_glyph("seven", Grouping::Priority), "?");
    assert_eq!(column_glyph("usr-1", Grouping::User), "@");
    assert_eq!(column_glyph("Mystery", Grouping::Status), "?");
}

#[test]
fn priority_label_names_known_levels() {
    assert_eq!(priority_label(0), "No priority");
    assert_eq!(priority_label(4), "Urgent");
    assert_eq!(priority_label(9), "Unknown");
}
