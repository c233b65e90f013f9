//! Aggregate state and its entities.
//!
//! [`AggregateState`] is the single mutable object in the dashboard. It is
//! owned by the receive cycle (see [`crate::data::shared`]) and only ever
//! mutated through [`AggregateState::apply`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// A character seen on this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
}

/// The zone the primary player is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub id: u64,
    pub name: String,
}

/// One participant's figures within the current encounter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combatant {
    /// Display name, unique within an encounter. The local player is usually `YOU`.
    pub name: String,
    pub job: String,
    pub total_damage: f64,
    pub dps: f64,
    pub deaths: u32,
    pub crit_percent: f64,
}

/// Party-wide statistics for the current fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encounter {
    pub title: String,
    pub zone_name: String,
    /// Elapsed time exactly as the feed formats it (`"00:29"`).
    pub duration: String,
    pub total_damage: f64,
    pub total_dps: f64,
    pub max_hit: String,
    pub is_active: bool,
}

/// Ordering used for display: highest DPS first, name ascending on ties.
pub fn standings(a: &Combatant, b: &Combatant) -> Ordering {
    b.dps.total_cmp(&a.dps).then_with(|| a.name.cmp(&b.name))
}

/// Combatants of the current encounter, kept in [`standings`] order with a
/// name lookup alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    entries: Vec<Combatant>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Roster {
    /// Build a roster from a combatant snapshot.
    ///
    /// Later entries win when a name repeats.
    pub fn new(combatants: impl IntoIterator<Item = Combatant>) -> Self {
        let mut entries: Vec<Combatant> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for combatant in combatants {
            match index.get(&combatant.name) {
                Some(&slot) => entries[slot] = combatant,
                None => {
                    index.insert(combatant.name.clone(), entries.len());
                    entries.push(combatant);
                }
            }
        }

        entries.sort_by(standings);
        let index = entries.iter().enumerate().map(|(i, c)| (c.name.clone(), i)).collect();

        Self { entries, index }
    }

    /// Look up a combatant by display name.
    pub fn get(&self, name: &str) -> Option<&Combatant> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Combatants in standings order.
    pub fn iter(&self) -> std::slice::Iter<'_, Combatant> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Combatant;
    type IntoIter = std::slice::Iter<'a, Combatant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Everything the dashboard knows about the session.
///
/// `players` only grows. `current_zone`, `current_encounter` and
/// `combatants` are point-in-time snapshots replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateState {
    pub primary_player: Option<Player>,
    pub players: BTreeMap<u64, Player>,
    pub current_zone: Option<Zone>,
    pub current_encounter: Option<Encounter>,
    pub combatants: Roster,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the locally controlled character, if the feed has announced one.
    pub fn primary_name(&self) -> Option<&str> {
        self.primary_player.as_ref().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(name: &str, dps: f64) -> Combatant {
        Combatant {
            name: name.to_string(),
            job: "Drg".to_string(),
            total_damage: dps * 10.0,
            dps,
            deaths: 0,
            crit_percent: 0.0,
        }
    }

    #[test]
    fn test_roster_orders_by_standings() {
        let roster = Roster::new(vec![
            combatant("Carol", 50.0),
            combatant("Alice", 100.0),
            combatant("Bob", 100.0),
        ]);

        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_roster_lookup_matches_order() {
        let roster = Roster::new(vec![combatant("Carol", 50.0), combatant("Alice", 100.0)]);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Carol").map(|c| c.dps), Some(50.0));
        assert_eq!(roster.get("Alice").map(|c| c.dps), Some(100.0));
        assert!(roster.get("Nobody").is_none());
        assert!(roster.contains("Alice"));
    }

    #[test]
    fn test_roster_duplicate_name_last_wins() {
        let roster = Roster::new(vec![combatant("Alice", 10.0), combatant("Alice", 30.0)]);

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("Alice").map(|c| c.dps), Some(30.0));
    }

    #[test]
    fn test_empty_state() {
        let state = AggregateState::new();
        assert!(state.primary_name().is_none());
        assert!(state.players.is_empty());
        assert!(state.combatants.is_empty());
    }
}
