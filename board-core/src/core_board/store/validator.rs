/*
    validator.rs - Content rules for new posts

    Checked in order, first failure wins:
    1. content must not be empty
    2. content must be at most MAX_CONTENT_LEN bytes of UTF-8
*/

use crate::core_board::store::errors::{BoardError, BoardResult};

/// Upper bound on content length, in UTF-8 bytes
pub const MAX_CONTENT_LEN: usize = 280;

/// Check a candidate post body against the board's content rules
pub fn validate_content(content: &str) -> BoardResult<()> {
    if content.is_empty() {
        return Err(BoardError::EmptyContent);
    }

    if content.len() > MAX_CONTENT_LEN {
        return Err(BoardError::ContentTooLong { len: content.len(), max: MAX_CONTENT_LEN });
    }

    Ok(())
}
