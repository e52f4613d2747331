use crate::common::fixtures::track;
use crate::{assert_eq, assert_matches, rstest, test_utils};
use rusty_jukebox::player::{MusicError, TrackQueue};
use std::time::Duration;

fn titles(queue: &TrackQueue) -> Vec<String> {
    queue.snapshot().into_iter().map(|t| t.title).collect()
}

fn queue_of(names: &[&str]) -> TrackQueue {
    let queue = TrackQueue::new();
    for name in names {
        queue.enqueue(track(name));
    }
    queue
}

#[tokio::test]
async fn test_dequeue_in_fifo_order() {
    test_utils::init();
    let queue = queue_of(&["A", "B", "C"]);

    assert_eq!(queue.dequeue().await.title, "A");
    assert_eq!(queue.dequeue().await.title, "B");
    assert_eq!(queue.dequeue().await.title, "C");
    assert!(queue.is_empty());
}

#[test]
fn test_enqueue_reports_position() {
    let queue = TrackQueue::new();
    assert_eq!(queue.enqueue(track("A")), 1);
    assert_eq!(queue.enqueue(track("B")), 2);
}

#[test]
fn test_peek_does_not_consume() {
    let queue = queue_of(&["A", "B"]);

    assert_eq!(queue.peek().unwrap().title, "A");
    assert_eq!(queue.peek().unwrap().title, "A");
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_peek_empty_queue() {
    let queue: TrackQueue = TrackQueue::new();
    assert_matches!(queue.peek(), Err(MusicError::EmptyQueue));
}

#[test]
fn test_remove_middle_track() {
    let queue = queue_of(&["A", "B", "C"]);

    let removed = queue.remove_at(1).unwrap();
    assert_eq!(removed.title, "B");
    assert_eq!(titles(&queue), vec!["A", "C"]);
}

#[rstest]
#[case(3)]
#[case(10)]
fn test_remove_out_of_range_leaves_queue_intact(#[case] index: usize) {
    let queue = queue_of(&["A", "B", "C"]);

    assert_matches!(
        queue.remove_at(index),
        Err(MusicError::IndexOutOfRange { len: 3, .. })
    );
    assert_eq!(titles(&queue), vec!["A", "B", "C"]);
}

#[test]
fn test_shuffle_preserves_tracks() {
    let names: Vec<String> = (0..20).map(|n| format!("T{}", n)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let queue = queue_of(&refs);

    let mut reordered = false;
    for _ in 0..50 {
        queue.shuffle();
        let mut current = titles(&queue);
        if current != names {
            reordered = true;
        }
        current.sort();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(current, expected);
    }
    assert!(reordered, "fifty shuffles never changed the order");
}

#[test]
fn test_shuffle_trivial_queues() {
    let empty: TrackQueue = TrackQueue::new();
    empty.shuffle();
    assert!(empty.is_empty());

    let single = queue_of(&["A"]);
    single.shuffle();
    assert_eq!(titles(&single), vec!["A"]);
}

#[test]
fn test_clear_returns_removed_count() {
    let queue = queue_of(&["A", "B", "C"]);
    assert_eq!(queue.clear(), 3);
    assert!(queue.is_empty());
    assert_eq!(queue.clear(), 0);
}

#[test]
fn test_pages() {
    let names: Vec<String> = (1..=25).map(|n| format!("T{}", n)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let queue = queue_of(&refs);

    let last = queue.page(3, 10).unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.offset, 20);
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.items[0].title, "T21");

    assert_matches!(queue.page(4, 10), Err(MusicError::IndexOutOfRange { .. }));
    assert_eq!(queue.total_duration(), Duration::from_secs(25 * 180));
}

#[tokio::test(start_paused = true)]
async fn test_dequeue_timeout_on_empty_queue() {
    let queue: TrackQueue = TrackQueue::new();
    assert_matches!(
        queue.dequeue_timeout(Duration::from_secs(5)).await,
        Err(MusicError::Cancelled)
    );
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_consumer_does_not_swallow_tracks() {
    let queue: TrackQueue = TrackQueue::new();
    assert_matches!(
        queue.dequeue_timeout(Duration::from_secs(5)).await,
        Err(MusicError::Cancelled)
    );

    queue.enqueue(track("A"));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.dequeue().await.title, "A");
}

#[tokio::test(start_paused = true)]
async fn test_dequeue_wakes_on_enqueue() {
    let queue = std::sync::Arc::new(TrackQueue::new());
    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.dequeue_timeout(Duration::from_secs(60)).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    queue.enqueue(track("late"));

    let got = consumer.await.unwrap().unwrap();
    assert_eq!(got.title, "late");
}
