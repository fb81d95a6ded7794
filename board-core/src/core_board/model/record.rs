/*
    record.rs - One posted message

    A record is created exactly once, by a successful post, and is never
    edited afterwards. Callers only ever hold copies.
*/

use super::types::{ActorId, Timestamp};
use serde::{Deserialize, Serialize};

/// A message on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the log, assigned sequentially from 0
    pub index: u64,

    /// Who posted it
    pub author: ActorId,

    /// Message text, 1..=280 bytes of UTF-8
    pub content: String,

    /// When the store accepted it
    pub created_at: Timestamp,
}

impl Record {
    pub fn new(index: u64, author: ActorId, content: String, created_at: Timestamp) -> Self {
        Record { index, author, content, created_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_board::model::ACTOR_ID_LEN;

    #[test]
    fn test_record_json_shape() {
        let author = ActorId::from_bytes([1; ACTOR_ID_LEN]);
        let record = Record::new(3, author, "gm".to_string(), Timestamp::from_secs(1_700_000_000));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["index"], 3);
        assert_eq!(value["author"], author.to_string());
        assert_eq!(value["content"], "gm");
        assert_eq!(value["created_at"], 1_700_000_000u64);
    }
}
