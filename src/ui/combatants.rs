//! The combatant panel: one stats line and one damage bar per visible row.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::format::{group_thousands, percent};
use super::layout::{MeterLayout, MeterRow};
use super::{panel, Theme};

/// Title of the combatant panel.
pub const COMBATANTS_TITLE: &str = "COMBATANTS";

/// Name the feed gives the local player in combatant lists.
pub const LOCAL_PLAYER_NAME: &str = "YOU";

/// Whether `name` refers to the locally controlled character.
pub fn is_local(name: &str, primary: Option<&str>) -> bool {
    name == LOCAL_PLAYER_NAME || primary.is_some_and(|p| p == name)
}

/// The stats line of a row: `1: YOU (War) - 100 (1,000) [66.7%]`.
pub fn row_label(row: &MeterRow) -> String {
    let c = row.entry.combatant;
    format!(
        "{}: {} ({}) - {} ({}) [{}]",
        row.rank,
        c.name,
        c.job,
        group_thousands(c.dps),
        group_thousands(c.total_damage),
        percent(row.entry.damage_percent),
    )
}

/// Lines for every visible row.
///
/// Rows are separated by a blank line. A zero-length bar is an empty line.
pub fn meter_lines(layout: &MeterLayout, theme: &Theme, primary: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(layout.rows.len() * 3);

    for (i, row) in layout.rows.iter().enumerate() {
        let color = theme.role_color(row.role);
        let mut style = Style::default().fg(color);
        if is_local(&row.entry.combatant.name, primary) {
            style = style.add_modifier(Modifier::BOLD);
        }

        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(row_label(row), style)));
        lines.push(Line::from(Span::styled(
            " ".repeat(usize::from(row.bar_len)),
            Style::default().bg(color),
        )));
    }

    lines
}

/// Render the combatant panel into `area`.
pub fn render(
    frame: &mut Frame,
    layout: &MeterLayout,
    theme: &Theme,
    primary: Option<&str>,
    waiting: bool,
    area: Rect,
) {
    let lines = if waiting {
        vec![Line::from(Span::styled(
            "Waiting for combat data...",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        meter_lines(layout, theme, primary)
    };

    frame.render_widget(Paragraph::new(lines).block(panel(COMBATANTS_TITLE, theme)), area);
}
