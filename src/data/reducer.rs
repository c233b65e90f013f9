//! Folding events into [`AggregateState`].

use super::event::Event;
use super::model::{AggregateState, Roster};

impl AggregateState {
    /// Apply one event in place.
    ///
    /// Returns `false` when the event cannot have changed anything
    /// (unknown msgtypes), `true` otherwise.
    pub fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::ChangeZone(zone) => {
                self.current_zone = Some(zone);
                true
            }
            Event::SendCharName { player, is_primary } => {
                if is_primary {
                    self.primary_player = Some(player.clone());
                }
                self.players.insert(player.id, player);
                true
            }
            Event::CombatData {
                encounter,
                combatants,
            } => {
                self.current_encounter = Some(encounter);
                self.combatants = Roster::new(combatants);
                true
            }
            Event::Unknown { .. } => false,
        }
    }
}

/// Pure form of [`AggregateState::apply`].
pub fn reduce(mut state: AggregateState, event: Event) -> AggregateState {
    state.apply(event);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::envelope::Envelope;
    use crate::data::model::{Combatant, Encounter, Player, Zone};

    fn zone(id: u64, name: &str) -> Event {
        Event::ChangeZone(Zone {
            id,
            name: name.to_string(),
        })
    }

    fn char_name(id: u64, name: &str, is_primary: bool) -> Event {
        Event::SendCharName {
            player: Player {
                id,
                name: name.to_string(),
            },
            is_primary,
        }
    }

    fn combatant(name: &str, damage: f64, dps: f64) -> Combatant {
        Combatant {
            name: name.to_string(),
            job: "War".to_string(),
            total_damage: damage,
            dps,
            deaths: 0,
            crit_percent: 10.0,
        }
    }

    fn combat(total_damage: f64, combatants: Vec<Combatant>) -> Event {
        Event::CombatData {
            encounter: Encounter {
                title: "Striking Dummy".to_string(),
                zone_name: "Middle La Noscea".to_string(),
                duration: "00:10".to_string(),
                total_damage,
                total_dps: total_damage / 10.0,
                max_hit: String::new(),
                is_active: true,
            },
            combatants,
        }
    }

    #[test]
    fn test_change_zone_replaces_zone() {
        let state = reduce(AggregateState::new(), zone(1, "Limsa"));
        let state = reduce(state, zone(2, "Gridania"));

        assert_eq!(state.current_zone.as_ref().map(|z| z.id), Some(2));
    }

    #[test]
    fn test_change_zone_idempotent() {
        let once = reduce(AggregateState::new(), zone(340, "The Lavender Beds"));
        let twice = reduce(once.clone(), zone(340, "The Lavender Beds"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_send_char_name_idempotent() {
        let once = reduce(AggregateState::new(), char_name(7, "Aya", true));
        let twice = reduce(once.clone(), char_name(7, "Aya", true));
        assert_eq!(once, twice);

        let once = reduce(AggregateState::new(), char_name(8, "Kyle", false));
        let twice = reduce(once.clone(), char_name(8, "Kyle", false));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_combat_data_idempotent() {
        let event = combat(1500.0, vec![combatant("A", 1000.0, 100.0)]);
        let once = reduce(AggregateState::new(), event.clone());
        let twice = reduce(once.clone(), event);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_primary_player_not_overwritten_by_other_character() {
        let state = reduce(AggregateState::new(), char_name(1, "Aya", true));
        let state = reduce(state, char_name(2, "Kyle", false));

        assert_eq!(state.primary_name(), Some("Aya"));
        assert_eq!(state.players.len(), 2);
    }

    #[test]
    fn test_primary_player_replaced_by_flagged_change() {
        let state = reduce(AggregateState::new(), char_name(1, "Aya", true));
        let state = reduce(state, char_name(2, "Kyle", true));

        assert_eq!(state.primary_name(), Some("Kyle"));
    }

    #[test]
    fn test_players_upsert_by_id_and_never_shrink() {
        let state = reduce(AggregateState::new(), char_name(1, "Aya", false));
        let state = reduce(state, char_name(2, "Kyle", false));
        let state = reduce(state, char_name(1, "Aya Brea", false));
        let state = reduce(state, zone(3, "Ul'dah"));
        let state = reduce(state, combat(0.0, vec![]));

        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players.get(&1).map(|p| p.name.as_str()), Some("Aya Brea"));
    }

    #[test]
    fn test_combat_data_replaces_combatants_wholesale() {
        let state = reduce(
            AggregateState::new(),
            combat(
                1500.0,
                vec![combatant("A", 1000.0, 100.0), combatant("B", 500.0, 50.0)],
            ),
        );
        assert!(state.combatants.contains("B"));

        let state = reduce(state, combat(3000.0, vec![combatant("A", 3000.0, 150.0)]));

        assert_eq!(state.combatants.len(), 1);
        assert!(!state.combatants.contains("B"));
        assert_eq!(state.combatants.get("A").map(|c| c.total_damage), Some(3000.0));
        assert_eq!(
            state.current_encounter.as_ref().map(|e| e.total_damage),
            Some(3000.0)
        );
    }

    #[test]
    fn test_unknown_event_is_identity() {
        let mut state = reduce(AggregateState::new(), char_name(1, "Aya", true));
        state = reduce(state, zone(2, "Limsa"));
        state = reduce(state, combat(100.0, vec![combatant("A", 100.0, 10.0)]));
        let before = state.clone();

        let changed = state.apply(Event::Unknown {
            raw_tag: "LogLine".to_string(),
        });

        assert!(!changed);
        assert_eq!(state, before);
    }

    #[test]
    fn test_decode_failure_leaves_state_untouched() {
        let state = reduce(AggregateState::new(), zone(2, "Limsa"));
        let before = serde_json::to_string(&state).unwrap();

        let envelope = Envelope::parse(
            r#"{"type":"broadcast","msgtype":"CombatData","msg":{"isActive":"true","Combatant":{}}}"#,
        )
        .unwrap();
        let mut after = state.clone();
        if let Ok(event) = Event::decode(envelope) {
            after.apply(event);
        }

        assert_eq!(after, state);
        assert_eq!(serde_json::to_string(&after).unwrap(), before);
    }
}
