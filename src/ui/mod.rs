//! Terminal rendering.
//!
//! ```text
//! ┌ FFXIV - TUI - DAMAGE METER ┐┌ ENCOUNTER ─────────────────┐  TOP_PANEL_HEIGHT
//! │ Hello, <primary>!          ││ title, duration, dmg, dps  │
//! └────────────────────────────┘└────────────────────────────┘
//! ┌ COMBATANTS ────────────────────────────────────────────────┐
//! │ 1: YOU (War) - 1,204 (36,120) [41.2%]                      │  row_cost
//! │ ██████████████████████                                     │  lines
//! │                                                            │  per row
//! └────────────────────────────────────────────────────────────┘
//!  status bar
//! ```
//!
//! Everything here is a pure function of [`App`]: drawing the same app into
//! the same viewport always produces the same buffer.

pub mod combatants;
pub mod format;
pub mod header;
pub mod layout;
mod theme;

pub use layout::{bar_length, MeterLayout, MeterRow, PanelMetrics};
pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::app::{App, FeedStatus};

/// Height of the greeting and encounter row.
pub const TOP_PANEL_HEIGHT: u16 = 8;

/// Width of the greeting panel.
const GREETING_WIDTH: u16 = 34;

/// A bordered, padded panel with a title set into the top border.
pub(crate) fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), theme.title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .padding(Padding::new(2, 2, 1, 1))
}

/// Draw one frame.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [top, body, status] = Layout::vertical([
        Constraint::Length(TOP_PANEL_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [greeting, encounter] =
        Layout::horizontal([Constraint::Length(GREETING_WIDTH), Constraint::Min(0)]).areas(top);

    header::render_greeting(frame, &app.state, &app.theme, greeting);
    header::render_encounter(frame, &app.state, &app.theme, encounter);

    let ranked = app.ranked();
    let meter = app.metrics.compute(
        &ranked,
        Size::new(area.width, area.height),
        TOP_PANEL_HEIGHT,
    );
    combatants::render(
        frame,
        &meter,
        &app.theme,
        app.state.primary_name(),
        app.state.current_encounter.is_none(),
        body,
    );

    frame.render_widget(Paragraph::new(status_line(app)), status);
}

/// The one-line status bar.
///
/// Shows a temporary message if one is active, otherwise the feed state and
/// key hints.
pub fn status_line(app: &App) -> Line<'static> {
    if let Some(msg) = app.get_status_message() {
        return Line::from(Span::styled(
            format!(" {} ", msg),
            Style::default().fg(app.theme.highlight),
        ));
    }

    match &app.feed_status {
        FeedStatus::Failed(err) => Line::from(Span::styled(
            format!(" Feed error: {} ", err),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        )),
        status => {
            let feed = match status {
                FeedStatus::Finished => "finished",
                _ => "live",
            };
            let limit_break = if app.rank_options.include_limit_break {
                "shown"
            } else {
                "hidden"
            };
            Line::from(Span::styled(
                format!(
                    " {} ({}) | LB: {} | l:limit break e:export q:quit",
                    app.source_description, feed, limit_break
                ),
                Style::default().add_modifier(Modifier::DIM),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{shared_state, Combatant, Encounter, Event, Player};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn combat_app(names: &[&str]) -> App {
        let (writer, reader) = shared_state();
        writer.apply(Event::SendCharName {
            player: Player {
                id: 7,
                name: "Aya Brea".to_string(),
            },
            is_primary: true,
        });
        writer.apply(Event::CombatData {
            encounter: Encounter {
                title: "Striking Dummy".to_string(),
                zone_name: "Middle La Noscea".to_string(),
                duration: "00:10".to_string(),
                total_damage: 100.0 * names.len() as f64,
                total_dps: 10.0 * names.len() as f64,
                max_hit: String::new(),
                is_active: true,
            },
            combatants: names
                .iter()
                .enumerate()
                .map(|(i, name)| Combatant {
                    name: name.to_string(),
                    job: "Blm".to_string(),
                    total_damage: 100.0,
                    dps: 100.0 - i as f64,
                    deaths: 0,
                    crit_percent: 0.0,
                })
                .collect(),
        });
        App::new(reader, "ws: test").with_theme(Theme::dark())
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_render_panels_and_rows() {
        let app = combat_app(&["YOU", "Tia"]);
        let text = draw(&app, 100, 40);

        assert!(text.contains("FFXIV - TUI - DAMAGE METER"));
        assert!(text.contains("Hello, Aya Brea!"));
        assert!(text.contains("ENCOUNTER"));
        assert!(text.contains("Damage:   200"));
        assert!(text.contains("COMBATANTS"));
        assert!(text.contains("1: YOU (Blm) - 100 (100) [50.0%]"));
        assert!(text.contains("2: Tia (Blm) - 99 (100) [50.0%]"));
        assert!(text.contains("l:limit break"));
    }

    #[test]
    fn test_panel_padding_offsets_content() {
        let app = combat_app(&["YOU"]);
        let text = draw(&app, 100, 40);
        let lines: Vec<&str> = text.lines().collect();

        // Border, then one blank padding line
        let padding_row: String = lines[1]
            .chars()
            .skip(1)
            .take(GREETING_WIDTH as usize - 2)
            .collect();
        assert!(padding_row.trim().is_empty());

        // Border plus two columns of padding before the greeting
        let greeting: String = lines[2].chars().skip(3).collect();
        assert!(greeting.starts_with("Hello, Aya Brea!"));
    }

    #[test]
    fn test_rows_truncated_to_viewport() {
        let names: Vec<String> = (0..20).map(|i| format!("P{:02}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let app = combat_app(&names);

        // 8 top + 5 chrome + 3 rows of 3 lines
        let text = draw(&app, 80, 22);

        assert!(text.contains("1: P00"));
        assert!(text.contains("3: P02"));
        assert!(!text.contains("4: P03"));
    }

    #[test]
    fn test_tiny_viewports_do_not_panic() {
        let app = combat_app(&["YOU", "Tia", "Kai"]);
        for width in 0..12 {
            for height in 0..16 {
                draw(&app, width, height);
            }
        }
    }

    #[test]
    fn test_waiting_before_combat_data() {
        let (_writer, reader) = shared_state();
        let app = App::new(reader, "ws: test");

        let text = draw(&app, 80, 24);
        assert!(text.contains("Hello, Player!"));
        assert!(text.contains("Waiting for combat data..."));
    }

    #[test]
    fn test_status_line_reports_feed_failure() {
        let mut app = combat_app(&["YOU"]);
        app.feed_status = FeedStatus::Failed("feed connection closed".to_string());

        let line = status_line(&app);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Feed error: feed connection closed ");
    }
}
