//! Greeting and encounter panels across the top of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::format::group_thousands;
use super::{panel, Theme};
use crate::data::{AggregateState, Encounter};

/// Title of the greeting panel.
pub const GREETING_TITLE: &str = "FFXIV - TUI - DAMAGE METER";

/// Title of the encounter panel.
pub const ENCOUNTER_TITLE: &str = "ENCOUNTER";

/// Lines shown in the greeting panel.
pub fn greeting_lines(state: &AggregateState, theme: &Theme) -> Vec<Line<'static>> {
    let name = state.primary_name().unwrap_or("Player");
    let zone = state
        .current_zone
        .as_ref()
        .map_or("Unknown", |z| z.name.as_str());

    let activity = match &state.current_encounter {
        Some(enc) if enc.is_active => {
            Span::styled("● In combat", Style::default().fg(theme.dps))
        }
        Some(_) => Span::styled("○ Out of combat", Style::default().add_modifier(Modifier::DIM)),
        None => Span::styled("○ Waiting", Style::default().add_modifier(Modifier::DIM)),
    };

    vec![
        Line::from(Span::styled(
            format!("Hello, {}!", name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Zone: {}", zone)),
        Line::from(activity),
    ]
}

/// Lines shown in the encounter panel.
pub fn encounter_lines(encounter: Option<&Encounter>) -> Vec<Line<'static>> {
    let Some(enc) = encounter else {
        return vec![Line::from(Span::styled(
            "Waiting for combat data...",
            Style::default().add_modifier(Modifier::DIM),
        ))];
    };

    vec![
        Line::from(Span::styled(
            enc.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Duration: {}", enc.duration)),
        Line::from(format!("Damage:   {}", group_thousands(enc.total_damage))),
        Line::from(format!("DPS:      {}", group_thousands(enc.total_dps))),
    ]
}

/// Render the greeting panel.
pub fn render_greeting(frame: &mut Frame, state: &AggregateState, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(greeting_lines(state, theme)).block(panel(GREETING_TITLE, theme));
    frame.render_widget(paragraph, area);
}

/// Render the encounter panel.
pub fn render_encounter(frame: &mut Frame, state: &AggregateState, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(encounter_lines(state.current_encounter.as_ref()))
        .block(panel(ENCOUNTER_TITLE, theme));
    frame.render_widget(paragraph, area);
}
