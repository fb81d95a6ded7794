//! Metrics for observability
//!
//! Thin helpers over the `metrics` facade. Nothing is exported unless the
//! binary installs a recorder; without one every call is a no-op.

use metrics::{counter, describe_counter, describe_gauge, gauge};

pub const POSTS_ACCEPTED: &str = "board.posts.accepted";
pub const POSTS_REJECTED: &str = "board.posts.rejected";
pub const READS_TOTAL: &str = "board.reads.total";
pub const RECORDS_COUNT: &str = "board.records.count";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(POSTS_ACCEPTED, "Posts appended to the board");
    describe_counter!(POSTS_REJECTED, "Posts refused, labelled by error kind");
    describe_counter!(READS_TOTAL, "Read operations, labelled by operation");
    describe_gauge!(RECORDS_COUNT, "Records currently on the board");
}

/// An append succeeded and the board now holds `count` records
pub fn record_post_accepted(count: u64) {
    counter!(POSTS_ACCEPTED).increment(1);
    gauge!(RECORDS_COUNT).set(count as f64);
}

pub fn record_post_rejected(reason: &'static str) {
    counter!(POSTS_REJECTED, "reason" => reason).increment(1);
}

pub fn record_read(operation: &'static str) {
    counter!(READS_TOTAL, "op" => operation).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_without_recorder() {
        init_metrics();
        record_post_accepted(1);
        record_post_rejected("empty_content");
        record_read("get");
    }
}
