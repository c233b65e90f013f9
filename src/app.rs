//! Application state for the render cycle.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Serialize;

use crate::data::{rank, AggregateState, RankOptions, RankedCombatant, Role, StateReader};
use crate::feed::{FeedError, FeedExit};
use crate::ui::{PanelMetrics, Theme};

/// How long a status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Where the receive cycle stands, as far as the UI knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Still receiving.
    Live,
    /// The source ran out of frames (replays only).
    Finished,
    /// The transport failed; the process is about to exit.
    Failed(String),
}

/// Main application state.
pub struct App {
    pub running: bool,

    // Latest copy of the shared state
    reader: StateReader,
    pub state: AggregateState,

    pub source_description: String,
    pub feed_status: FeedStatus,

    pub rank_options: RankOptions,
    pub metrics: PanelMetrics,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `reader`.
    pub fn new(reader: StateReader, source_description: impl Into<String>) -> Self {
        let state = reader.snapshot();
        Self {
            running: true,
            reader,
            state,
            source_description: source_description.into(),
            feed_status: FeedStatus::Live,
            rank_options: RankOptions::default(),
            metrics: PanelMetrics::default(),
            theme: Theme::default(),
            status_message: None,
        }
    }

    /// Set the ranking options.
    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.rank_options = options;
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Take the newest state from the receive cycle.
    ///
    /// Returns true if anything changed since the last refresh.
    pub fn refresh(&mut self) -> bool {
        match self.reader.latest() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// The current standings under the active rank options.
    pub fn ranked(&self) -> Vec<RankedCombatant<'_>> {
        rank(
            &self.state.combatants,
            self.state.current_encounter.as_ref(),
            self.rank_options,
        )
    }

    /// Record how the receive cycle ended.
    ///
    /// A transport failure stops the render cycle.
    pub fn record_feed_exit(&mut self, exit: &Result<FeedExit, FeedError>) {
        match exit {
            Ok(FeedExit::Exhausted) => {
                self.feed_status = FeedStatus::Finished;
                self.set_status_message("Feed finished".to_string());
            }
            Ok(FeedExit::Shutdown) => self.feed_status = FeedStatus::Finished,
            Err(e) => {
                self.feed_status = FeedStatus::Failed(e.to_string());
                self.quit();
            }
        }
    }

    /// Show or hide the limit break entry.
    pub fn toggle_limit_break(&mut self) {
        self.rank_options.include_limit_break = !self.rank_options.include_limit_break;
        let state = if self.rank_options.include_limit_break {
            "shown"
        } else {
            "hidden"
        };
        self.set_status_message(format!("Limit break {}", state));
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current standings and session state to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let export = Export {
            primary_player: self.state.primary_name(),
            zone: self.state.current_zone.as_ref().map(|z| z.name.as_str()),
            encounter: self.state.current_encounter.as_ref(),
            include_limit_break: self.rank_options.include_limit_break,
            standings: self
                .ranked()
                .into_iter()
                .enumerate()
                .map(|(i, entry)| ExportRow {
                    rank: i + 1,
                    name: &entry.combatant.name,
                    job: &entry.combatant.job,
                    role: Role::classify(&entry.combatant.job),
                    dps: entry.combatant.dps,
                    total_damage: entry.combatant.total_damage,
                    damage_percent: entry.damage_percent,
                    deaths: entry.combatant.deaths,
                    crit_percent: entry.combatant.crit_percent,
                })
                .collect(),
            players: self.state.players.values().map(|p| p.name.as_str()).collect(),
        };

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct Export<'a> {
    primary_player: Option<&'a str>,
    zone: Option<&'a str>,
    encounter: Option<&'a crate::data::Encounter>,
    include_limit_break: bool,
    standings: Vec<ExportRow<'a>>,
    players: Vec<&'a str>,
}

#[derive(Serialize)]
struct ExportRow<'a> {
    rank: usize,
    name: &'a str,
    job: &'a str,
    role: Role,
    dps: f64,
    total_damage: f64,
    damage_percent: f64,
    deaths: u32,
    crit_percent: f64,
}
