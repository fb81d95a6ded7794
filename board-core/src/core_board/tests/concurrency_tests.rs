/*
    concurrency_tests.rs - Many writers and readers against one store
*/

use super::actor;
use crate::core_board::RecordStore;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const WRITERS: u8 = 8;
const POSTS_PER_WRITER: usize = 50;

#[test]
fn test_concurrent_posts_get_unique_sequential_indices() {
    let store = Arc::new(RecordStore::new());

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = store.clone();
            thread::spawn(move || {
                (0..POSTS_PER_WRITER)
                    .map(|i| store.post(actor(w), format!("writer {} post {}", w, i)).unwrap())
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        let indices = handle.join().unwrap();
        // A single writer's posts land in the order it made them
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        for index in indices {
            assert!(seen.insert(index), "index {} handed out twice", index);
        }
    }

    let total = WRITERS as usize * POSTS_PER_WRITER;
    assert_eq!(store.count(), total as u64);
    assert_eq!(seen, (0..total as u64).collect::<HashSet<_>>());

    for w in 0..WRITERS {
        let records = store.get_by_author(&actor(w));
        assert_eq!(records.len(), POSTS_PER_WRITER);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.author, actor(w));
            assert_eq!(record.content, format!("writer {} post {}", w, i));
        }
    }
}

#[test]
fn test_readers_never_see_partial_appends() {
    let store = Arc::new(RecordStore::new());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let all = store.get_all();
                    for (i, record) in all.iter().enumerate() {
                        assert_eq!(record.index, i as u64);
                    }

                    let mine = store.get_by_author(&actor(1));
                    let count_after = store.count();
                    for record in &mine {
                        assert_eq!(record.author, actor(1));
                        assert!(record.index < count_after);
                    }
                }
            })
        })
        .collect();

    let writers: Vec<_> = (1..=2)
        .map(|w| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    store.post(actor(w), format!("{}", i)).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.count(), 400);
}
