//! Adaptive layout for the combatant panel.
//!
//! Decides how many ranked combatants fit in the viewport and how long each
//! one's damage bar is:
//!
//! ```text
//! available = height - consumed - chrome_lines
//! max_rows  = available / row_cost
//! meter     = width - panel_chrome_width
//! bar       = floor(meter * damage_percent / 100)
//! ```
//!
//! Every subtraction saturates, so a viewport smaller than the chrome yields
//! zero rows instead of an error.

use ratatui::layout::Size;

use crate::data::{RankedCombatant, Role};

/// Fixed costs of the combatant panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelMetrics {
    /// Lines used by everything except the rows (borders, padding, status bar).
    pub chrome_lines: u16,
    /// Lines per combatant: stats line, bar line, blank separator.
    pub row_cost: u16,
    /// Columns used by borders and horizontal padding.
    pub panel_chrome_width: u16,
}

impl Default for PanelMetrics {
    fn default() -> Self {
        Self {
            // border 2 + vertical padding 2 + status bar 1
            chrome_lines: 5,
            row_cost: 3,
            // border 2 + horizontal padding 4
            panel_chrome_width: 6,
        }
    }
}

/// One visible combatant row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterRow<'a> {
    /// 1-based position in the standings.
    pub rank: usize,
    pub entry: RankedCombatant<'a>,
    pub role: Role,
    /// Bar length in columns, never wider than the meter.
    pub bar_len: u16,
}

/// Result of fitting the ranked list into a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterLayout<'a> {
    pub max_rows: usize,
    pub meter_width: u16,
    pub rows: Vec<MeterRow<'a>>,
}

/// Length of a bar for `damage_percent` on a meter `meter_width` columns wide.
pub fn bar_length(meter_width: u16, damage_percent: f64) -> u16 {
    if !damage_percent.is_finite() || damage_percent <= 0.0 {
        return 0;
    }
    let fraction = damage_percent.min(100.0) / 100.0;
    (f64::from(meter_width) * fraction).floor() as u16
}

impl PanelMetrics {
    /// Number of rows that fit below `consumed_height` lines in `viewport_height`.
    pub fn max_rows(&self, viewport_height: u16, consumed_height: u16) -> usize {
        if self.row_cost == 0 {
            return 0;
        }
        let available = viewport_height
            .saturating_sub(consumed_height)
            .saturating_sub(self.chrome_lines);
        usize::from(available / self.row_cost)
    }

    /// Width left for bars in a panel `panel_width` columns wide.
    pub fn meter_width(&self, panel_width: u16) -> u16 {
        panel_width.saturating_sub(self.panel_chrome_width)
    }

    /// Fit `ranked` into `viewport`, keeping the highest-ranked entries.
    pub fn compute<'a>(
        &self,
        ranked: &[RankedCombatant<'a>],
        viewport: Size,
        consumed_height: u16,
    ) -> MeterLayout<'a> {
        let max_rows = self.max_rows(viewport.height, consumed_height);
        let meter_width = self.meter_width(viewport.width);

        let rows = ranked
            .iter()
            .take(max_rows)
            .enumerate()
            .map(|(i, entry)| MeterRow {
                rank: i + 1,
                entry: *entry,
                role: Role::classify(&entry.combatant.job),
                bar_len: bar_length(meter_width, entry.damage_percent),
            })
            .collect();

        MeterLayout {
            max_rows,
            meter_width,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{rank, Combatant, Encounter, RankOptions, Roster};

    fn combatant(name: &str, job: &str, damage: f64, dps: f64) -> Combatant {
        Combatant {
            name: name.to_string(),
            job: job.to_string(),
            total_damage: damage,
            dps,
            deaths: 0,
            crit_percent: 0.0,
        }
    }

    fn encounter(total_damage: f64) -> Encounter {
        Encounter {
            title: "Striking Dummy".to_string(),
            zone_name: "Middle La Noscea".to_string(),
            duration: "00:10".to_string(),
            total_damage,
            total_dps: total_damage / 10.0,
            max_hit: String::new(),
            is_active: true,
        }
    }

    #[test]
    fn test_two_combatant_example() {
        let roster = Roster::new(vec![
            combatant("B", "Whm", 500.0, 50.0),
            combatant("A", "Pld", 1000.0, 100.0),
        ]);
        let enc = encounter(1500.0);
        let ranked = rank(&roster, Some(&enc), RankOptions::default());

        // 10 lines of overhead in a 40-line viewport
        let metrics = PanelMetrics {
            chrome_lines: 5,
            row_cost: 3,
            panel_chrome_width: 60,
        };
        let layout = metrics.compute(&ranked, Size::new(100, 40), 5);

        assert_eq!(layout.max_rows, 10);
        assert_eq!(layout.meter_width, 40);
        assert_eq!(layout.rows.len(), 2);

        assert_eq!(layout.rows[0].rank, 1);
        assert_eq!(layout.rows[0].entry.combatant.name, "A");
        assert_eq!(layout.rows[0].role, Role::Tank);
        assert_eq!(layout.rows[0].bar_len, 26);

        assert_eq!(layout.rows[1].entry.combatant.name, "B");
        assert_eq!(layout.rows[1].role, Role::Healer);
        assert_eq!(layout.rows[1].bar_len, 13);
    }

    #[test]
    fn test_truncates_lowest_ranked() {
        let roster = Roster::new(
            (0..10).map(|i| combatant(&format!("P{}", i), "Blm", 100.0, f64::from(i))),
        );
        let ranked = rank(&roster, Some(&encounter(1000.0)), RankOptions::default());

        let layout = PanelMetrics::default().compute(&ranked, Size::new(80, 8 + 5 + 9), 8);

        assert_eq!(layout.max_rows, 3);
        let names: Vec<&str> = layout.rows.iter().map(|r| r.entry.combatant.name.as_str()).collect();
        assert_eq!(names, ["P9", "P8", "P7"]);
    }

    #[test]
    fn test_degenerate_viewports_never_overflow() {
        let roster = Roster::new((0..50).map(|i| combatant(&format!("P{}", i), "War", 10.0, 1.0)));
        let ranked = rank(&roster, Some(&encounter(500.0)), RankOptions::default());
        let metrics = PanelMetrics::default();

        for height in 0..=60u16 {
            for consumed in [0u16, 8, 40, u16::MAX] {
                for width in [0u16, 1, 5, 6, 7, 120] {
                    let layout = metrics.compute(&ranked, Size::new(width, height), consumed);
                    let used = layout.rows.len() as u32 * u32::from(metrics.row_cost)
                        + u32::from(metrics.chrome_lines)
                        + u32::from(consumed);

                    assert!(layout.rows.len() <= layout.max_rows);
                    if !layout.rows.is_empty() {
                        assert!(used <= u32::from(height));
                    }
                    assert!(layout.rows.iter().all(|r| r.bar_len <= layout.meter_width));
                }
            }
        }
    }

    #[test]
    fn test_bar_length_edges() {
        assert_eq!(bar_length(40, 0.0), 0);
        assert_eq!(bar_length(40, -5.0), 0);
        assert_eq!(bar_length(40, f64::NAN), 0);
        assert_eq!(bar_length(40, 100.0), 40);
        assert_eq!(bar_length(40, 250.0), 40);
        assert_eq!(bar_length(0, 100.0), 0);
        assert_eq!(bar_length(40, 2.4), 0);
    }

    #[test]
    fn test_zero_row_cost_yields_no_rows() {
        let metrics = PanelMetrics {
            row_cost: 0,
            ..PanelMetrics::default()
        };
        assert_eq!(metrics.max_rows(100, 0), 0);
    }
}
