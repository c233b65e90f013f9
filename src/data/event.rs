//! Typed feed events.
//!
//! An [`Envelope`]'s payload is decoded exactly once, at the boundary, into
//! an [`Event`]. Everything downstream works on these shapes; numeric
//! strings have already been turned into numbers by [`super::stat`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::envelope::Envelope;
use super::model::{Combatant, Encounter, Player, Zone};
use super::stat;

pub const MSG_CHANGE_ZONE: &str = "ChangeZone";
pub const MSG_SEND_CHAR_NAME: &str = "SendCharName";
pub const MSG_COMBAT_DATA: &str = "CombatData";

/// Inner `type` value marking a primary-player change on `SendCharName`.
pub const PRIMARY_PLAYER_MARKER: &str = "ChangePrimaryPlayer";

/// A frame that could not be turned into an [`Event`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not a JSON envelope.
    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The payload does not match the schema its `msgtype` implies.
    #[error("invalid {msg_type} payload: {source}")]
    Payload {
        msg_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded feed event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The primary player moved to another zone.
    ChangeZone(Zone),
    /// A character name was announced.
    SendCharName { player: Player, is_primary: bool },
    /// Full snapshot of the current encounter.
    CombatData {
        encounter: Encounter,
        combatants: Vec<Combatant>,
    },
    /// A msgtype this dashboard does not use.
    Unknown { raw_tag: String },
}

impl Event {
    /// Decode an envelope's payload according to its `msgtype`.
    ///
    /// Unrecognized msgtypes decode to [`Event::Unknown`].
    pub fn decode(envelope: Envelope) -> Result<Self, DecodeError> {
        let Envelope { msg_type, msg, .. } = envelope;

        match msg_type.as_str() {
            MSG_CHANGE_ZONE => {
                let payload: ChangeZonePayload = decode_payload(&msg_type, msg)?;
                Ok(Event::ChangeZone(Zone {
                    id: payload.zone_id,
                    name: payload.zone_name,
                }))
            }
            MSG_SEND_CHAR_NAME => {
                let payload: SendCharNamePayload = decode_payload(&msg_type, msg)?;
                Ok(Event::SendCharName {
                    is_primary: payload.marker.as_deref() == Some(PRIMARY_PLAYER_MARKER),
                    player: Player {
                        id: payload.char_id,
                        name: payload.char_name,
                    },
                })
            }
            MSG_COMBAT_DATA => {
                let payload: CombatDataPayload = decode_payload(&msg_type, msg)?;
                Ok(payload.into_event())
            }
            _ => Ok(Event::Unknown {
                raw_tag: msg_type.clone(),
            }),
        }
    }

    /// The msgtype this event was decoded from.
    pub fn tag(&self) -> &str {
        match self {
            Event::ChangeZone(_) => MSG_CHANGE_ZONE,
            Event::SendCharName { .. } => MSG_SEND_CHAR_NAME,
            Event::CombatData { .. } => MSG_COMBAT_DATA,
            Event::Unknown { raw_tag } => raw_tag.as_str(),
        }
    }
}

fn decode_payload<T: DeserializeOwned>(
    msg_type: &str,
    msg: Map<String, Value>,
) -> Result<T, DecodeError> {
    serde_json::from_value(Value::Object(msg)).map_err(|source| DecodeError::Payload {
        msg_type: msg_type.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct ChangeZonePayload {
    #[serde(rename = "zoneID")]
    zone_id: u64,
    #[serde(rename = "zoneName")]
    zone_name: String,
}

#[derive(Deserialize)]
struct SendCharNamePayload {
    #[serde(rename = "charID")]
    char_id: u64,
    #[serde(rename = "charName")]
    char_name: String,
    #[serde(rename = "type", default)]
    marker: Option<String>,
}

#[derive(Deserialize)]
struct CombatDataPayload {
    #[serde(rename = "isActive", deserialize_with = "deserialize_flag")]
    is_active: bool,
    #[serde(rename = "Encounter")]
    encounter: EncounterPayload,
    #[serde(rename = "Combatant")]
    combatants: BTreeMap<String, CombatantPayload>,
}

#[derive(Deserialize)]
struct EncounterPayload {
    #[serde(deserialize_with = "stat::deserialize_text")]
    title: String,
    #[serde(rename = "CurrentZoneName", deserialize_with = "stat::deserialize_text")]
    zone_name: String,
    #[serde(deserialize_with = "stat::deserialize_text")]
    duration: String,
    #[serde(deserialize_with = "stat::deserialize")]
    damage: f64,
    #[serde(deserialize_with = "stat::deserialize")]
    dps: f64,
    #[serde(rename = "maxhit", deserialize_with = "stat::deserialize_text")]
    max_hit: String,
}

#[derive(Deserialize)]
struct CombatantPayload {
    #[serde(deserialize_with = "stat::deserialize")]
    damage: f64,
    #[serde(deserialize_with = "stat::deserialize")]
    dps: f64,
    #[serde(rename = "Job", deserialize_with = "stat::deserialize_text")]
    job: String,
    #[serde(deserialize_with = "stat::deserialize_count")]
    deaths: u32,
    #[serde(rename = "crithit%", deserialize_with = "stat::deserialize")]
    crit_percent: f64,
}

impl CombatDataPayload {
    fn into_event(self) -> Event {
        let encounter = Encounter {
            title: self.encounter.title,
            zone_name: self.encounter.zone_name,
            duration: self.encounter.duration,
            total_damage: self.encounter.damage,
            total_dps: self.encounter.dps,
            max_hit: self.encounter.max_hit,
            is_active: self.is_active,
        };

        let combatants = self
            .combatants
            .into_iter()
            .map(|(name, c)| Combatant {
                name,
                job: c.job,
                total_damage: c.damage,
                dps: c.dps,
                deaths: c.deaths,
                crit_percent: c.crit_percent,
            })
            .collect();

        Event::CombatData {
            encounter,
            combatants,
        }
    }
}

/// `isActive` arrives as either a JSON boolean or the strings `"true"`/`"false"`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
    })
}
