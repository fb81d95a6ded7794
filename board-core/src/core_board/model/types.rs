/*
    types.rs - Common types for board records

    Defines:
    - ActorId: fixed-width identity of whoever posted a record
    - Timestamp: seconds since the Unix epoch
*/

use crate::core_board::store::errors::BoardError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width of an actor id in bytes
pub const ACTOR_ID_LEN: usize = 20;

/// Opaque identity of a poster, as resolved by the authentication layer.
///
/// Text form is `0x` followed by 40 lowercase hex digits. Parsing accepts
/// either case and an optional `0x` prefix. Human-readable serializers get
/// the text form; binary ones get the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId([u8; ACTOR_ID_LEN]);

impl ActorId {
    pub const fn from_bytes(bytes: [u8; ACTOR_ID_LEN]) -> Self {
        ActorId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACTOR_ID_LEN] {
        &self.0
    }

    /// Parse the hex text form
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

        if digits.len() != ACTOR_ID_LEN * 2 {
            return Err(BoardError::InvalidActorId(format!(
                "expected {} hex digits, got {}",
                ACTOR_ID_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; ACTOR_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| BoardError::InvalidActorId(format!("{}: {}", s, e)))?;
        Ok(ActorId(bytes))
    }
}

impl FromStr for ActorId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActorId::parse(s)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self)
    }
}

impl Serialize for ActorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ActorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            ActorId::parse(&text).map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; ACTOR_ID_LEN]>::deserialize(deserializer)?;
            Ok(ActorId(bytes))
        }
    }
}

/// Unix timestamp in seconds
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    #[test]
    fn test_parse_and_display() {
        let id = ActorId::parse(ALICE).unwrap();
        assert_eq!(id.to_string(), ALICE);
        assert_eq!(id.as_bytes()[0], 0x70);
    }

    #[test]
    fn test_parse_accepts_missing_prefix_and_uppercase() {
        let upper = ALICE.trim_start_matches("0x").to_uppercase();
        assert_eq!(ActorId::parse(&upper).unwrap(), ActorId::parse(ALICE).unwrap());
        assert_eq!(
            format!("0X{}", upper).parse::<ActorId>().unwrap(),
            ActorId::parse(ALICE).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(ActorId::parse("0x1234"), Err(BoardError::InvalidActorId(_))));
        assert!(matches!(ActorId::parse(""), Err(BoardError::InvalidActorId(_))));

        let not_hex = format!("0x{}", "zz".repeat(ACTOR_ID_LEN));
        assert!(matches!(ActorId::parse(&not_hex), Err(BoardError::InvalidActorId(_))));
    }

    #[test]
    fn test_json_uses_text_form() {
        let id = ActorId::from_bytes([0xab; ACTOR_ID_LEN]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(ACTOR_ID_LEN)));

        let back: ActorId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_bincode_uses_raw_bytes() {
        let id = ActorId::from_bytes([7; ACTOR_ID_LEN]);
        let bytes = bincode::serialize(&id).unwrap();
        assert_eq!(bytes.len(), ACTOR_ID_LEN);
        assert_eq!(bincode::deserialize::<ActorId>(&bytes).unwrap(), id);
    }

    #[test]
    fn test_timestamp_is_plain_number_in_json() {
        assert_eq!(serde_json::to_string(&Timestamp::from_secs(42)).unwrap(), "42");
        assert!(Timestamp::from_secs(1) < Timestamp::from_secs(2));
    }
}
