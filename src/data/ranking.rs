//! Ranking combatants for display.

use super::model::{standings, Combatant, Encounter, Roster};

/// Display name the feed gives the limit break pseudo-combatant.
pub const LIMIT_BREAK_NAME: &str = "Limit Break";

/// Options controlling which combatants are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Keep the limit break pseudo-entry in the output.
    pub include_limit_break: bool,
}

/// A combatant annotated with its share of the encounter's damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCombatant<'a> {
    pub combatant: &'a Combatant,
    /// Share of the encounter total, always within `0.0..=100.0`.
    pub damage_percent: f64,
}

/// Whether a combatant is the limit break pseudo-entry rather than a player.
pub fn is_limit_break(combatant: &Combatant) -> bool {
    combatant.name.eq_ignore_ascii_case(LIMIT_BREAK_NAME)
        || combatant.job.eq_ignore_ascii_case("LB")
}

/// Percentage of `total` contributed by `damage`, clamped to `0..=100`.
///
/// A zero (or unusable) total yields `0.0`.
pub fn damage_percent(damage: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }

    let percent = 100.0 * damage / total;
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Order the roster for display: DPS descending, name ascending on ties.
pub fn rank<'a>(
    roster: &'a Roster,
    encounter: Option<&Encounter>,
    options: RankOptions,
) -> Vec<RankedCombatant<'a>> {
    let total = encounter.map_or(0.0, |e| e.total_damage);

    let mut ranked: Vec<RankedCombatant<'a>> = roster
        .iter()
        .filter(|c| options.include_limit_break || !is_limit_break(c))
        .map(|combatant| RankedCombatant {
            combatant,
            damage_percent: damage_percent(combatant.total_damage, total),
        })
        .collect();

    // Roster is kept in standings order, so this stable sort is a linear pass.
    ranked.sort_by(|a, b| standings(a.combatant, b.combatant));
    ranked
}
