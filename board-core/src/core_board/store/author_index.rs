/*
    author_index.rs - Actor -> record indices

    Derived from the record log: every append pushes one index for its
    author, so each list is in posting order. Nothing else writes to it.
*/

use crate::core_board::model::ActorId;
use std::collections::HashMap;

/// Index for looking up an author's records without scanning the log
#[derive(Debug, Default, Clone)]
pub struct AuthorIndex {
    by_author: HashMap<ActorId, Vec<u64>>,
}

impl AuthorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `author` wrote the record at `index`
    pub fn insert(&mut self, author: ActorId, index: u64) {
        self.by_author.entry(author).or_default().push(index);
    }

    /// Indices written by `author`, oldest first. Empty if they never posted.
    pub fn indices(&self, author: &ActorId) -> &[u64] {
        self.by_author.get(author).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct authors
    pub fn author_count(&self) -> usize {
        self.by_author.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_board::model::ACTOR_ID_LEN;

    #[test]
    fn test_unknown_author_is_empty() {
        let index = AuthorIndex::new();
        assert!(index.indices(&ActorId::from_bytes([9; ACTOR_ID_LEN])).is_empty());
        assert_eq!(index.author_count(), 0);
    }

    #[test]
    fn test_insert_keeps_order_per_author() {
        let a = ActorId::from_bytes([1; ACTOR_ID_LEN]);
        let b = ActorId::from_bytes([2; ACTOR_ID_LEN]);

        let mut index = AuthorIndex::new();
        index.insert(a, 0);
        index.insert(b, 1);
        index.insert(a, 2);

        assert_eq!(index.indices(&a), &[0, 2]);
        assert_eq!(index.indices(&b), &[1]);
        assert_eq!(index.author_count(), 2);
    }
}
