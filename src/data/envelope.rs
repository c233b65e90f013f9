//! Raw feed envelopes.
//!
//! Every frame the feed sends is a JSON object of the form
//! `{"type": ..., "msgtype": ..., "msg": {...}}`. The envelope is parsed
//! without interpreting `msg`; [`crate::data::Event::decode`] does that.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::event::DecodeError;

/// One message unit received from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Outer routing tag (`"broadcast"` for subscription events).
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Discriminates the payload schema (`"CombatData"`, `"ChangeZone"`, ...).
    #[serde(rename = "msgtype", default)]
    pub msg_type: String,

    /// Untyped payload fields.
    #[serde(default)]
    pub msg: Map<String, Value>,
}

impl Envelope {
    /// Parse a text frame into an envelope.
    pub fn parse(frame: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(frame).map_err(DecodeError::Envelope)
    }

    /// Read an envelope out of an already parsed frame, leaving it intact.
    pub fn from_value(frame: &Value) -> Result<Self, DecodeError> {
        Self::deserialize(frame).map_err(DecodeError::Envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let envelope = Envelope::parse(
            r#"{"type":"broadcast","msgtype":"ChangeZone","msg":{"zoneID":340,"zoneName":"The Lavender Beds"}}"#,
        )
        .unwrap();

        assert_eq!(envelope.kind, "broadcast");
        assert_eq!(envelope.msg_type, "ChangeZone");
        assert_eq!(envelope.msg.get("zoneID"), Some(&Value::from(340)));
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let envelope = Envelope::parse(r#"{"rseq": 1}"#).unwrap();
        assert!(envelope.kind.is_empty());
        assert!(envelope.msg_type.is_empty());
        assert!(envelope.msg.is_empty());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        assert!(Envelope::parse(r#"{"msgtype":"CombatData","msg":"nope"}"#).is_err());
        assert!(Envelope::parse("not json").is_err());
        assert!(Envelope::parse("[1,2,3]").is_err());
    }

    #[test]
    fn test_from_value_matches_parse() {
        let frame = r#"{"type":"broadcast","msgtype":"ChangeZone","msg":{"zoneID":340,"zoneName":"X"},"rseq":4}"#;
        let value: Value = serde_json::from_str(frame).unwrap();

        assert_eq!(Envelope::from_value(&value).unwrap(), Envelope::parse(frame).unwrap());
        assert!(Envelope::from_value(&Value::from(vec![1, 2])).is_err());
        assert_eq!(value.get("rseq"), Some(&Value::from(4)));
    }

    #[test]
    fn test_pretty_print_round_trips() {
        let frame = r#"{"type":"broadcast","msgtype":"SendCharName","msg":{"charID":1,"charName":"Aya"}}"#;
        let envelope = Envelope::parse(frame).unwrap();
        let pretty = serde_json::to_string_pretty(&envelope).unwrap();

        assert!(pretty.contains("\n  \"msgtype\": \"SendCharName\""));
        assert_eq!(Envelope::parse(&pretty).unwrap(), envelope);
    }
}
