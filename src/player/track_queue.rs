//! The queue of pending tracks for a single guild.
//!
//! A plain FIFO on the consuming side, with indexed reads, removal and
//! shuffling for the command layer. Items and suspended consumers live behind
//! one mutex. An enqueue with consumers waiting hands the item straight to the
//! one that has waited longest, so waiters are served in the order they
//! arrived. The lock is never held across an await.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

use super::error::{MusicError, MusicResult};
use super::track::TrackMetadata;

/// One page of a queue snapshot, as shown by the queue command.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuePage<T> {
    /// The items on this page, in queue order.
    pub items: Vec<T>,
    /// Zero-based queue position of the first item on the page.
    pub offset: usize,
    /// One-based page number.
    pub page: usize,
    pub total_pages: usize,
    /// Length of the whole queue when the snapshot was taken.
    pub total_len: usize,
}

struct Inner<T> {
    items: VecDeque<T>,
    // Suspended consumers, oldest first
    waiters: VecDeque<oneshot::Sender<T>>,
}

impl<T> Inner<T> {
    /// Give `item` to the oldest consumer still waiting, or hand it back.
    fn hand_off(&mut self, mut item: T) -> Result<(), T> {
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.send(item) {
                Ok(()) => return Ok(()),
                // That consumer gave up; try the next one
                Err(returned) => item = returned,
            }
        }
        Err(item)
    }
}

pub struct TrackQueue<T = TrackMetadata> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for TrackQueue<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                waiters: VecDeque::new(),
            }),
        }
    }
}

/// A consumer suspended in `dequeue`. If it is dropped after an item was
/// handed to it but before it was received, the item goes back to the head.
struct Waiter<'a, T> {
    queue: &'a TrackQueue<T>,
    receiver: oneshot::Receiver<T>,
}

impl<T> Drop for Waiter<'_, T> {
    fn drop(&mut self) {
        self.receiver.close();
        let mut inner = self.queue.inner.lock();
        inner.waiters.retain(|sender| !sender.is_closed());
        if let Ok(item) = self.receiver.try_recv() {
            if let Err(item) = inner.hand_off(item) {
                inner.items.push_front(item);
            }
        }
    }
}

impl<T> TrackQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the tail, waking exactly one waiting consumer.
    /// Returns the 1-based position the item took; an item handed straight
    /// to a waiting consumer is at position 1.
    pub fn enqueue(&self, item: T) -> usize {
        let mut inner = self.inner.lock();
        match inner.hand_off(item) {
            Ok(()) => 1,
            Err(item) => {
                inner.items.push_back(item);
                inner.items.len()
            }
        }
    }

    /// Remove and return the head of the queue, waiting for one to arrive if empty.
    ///
    /// Concurrent waiters receive items in the order they started waiting.
    /// Dropping the returned future cancels the wait without consuming anything.
    pub async fn dequeue(&self) -> T {
        loop {
            let receiver = {
                let mut inner = self.inner.lock();
                if let Some(item) = inner.items.pop_front() {
                    return item;
                }
                let (sender, receiver) = oneshot::channel();
                inner.waiters.push_back(sender);
                receiver
            };

            let mut waiter = Waiter {
                queue: self,
                receiver,
            };
            if let Ok(item) = (&mut waiter.receiver).await {
                return item;
            }
        }
    }

    /// Like [`dequeue`](Self::dequeue), but gives up after `wait` with `MusicError::Cancelled`.
    pub async fn dequeue_timeout(&self, wait: Duration) -> MusicResult<T> {
        tokio::time::timeout(wait, self.dequeue())
            .await
            .map_err(|_| MusicError::Cancelled)
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Remove the item at a zero-based position, returning it.
    pub fn remove_at(&self, index: usize) -> MusicResult<T> {
        let mut inner = self.inner.lock();
        let len = inner.items.len();
        inner
            .items
            .remove(index)
            .ok_or(MusicError::IndexOutOfRange { index, len })
    }

    /// Randomly reorder every queued item.
    pub fn shuffle(&self) {
        let mut inner = self.inner.lock();
        if inner.items.len() < 2 {
            return;
        }
        inner.items.make_contiguous().shuffle(&mut rand::rng());
        debug!("Shuffled {} queued items", inner.items.len());
    }

    /// Drop every queued item, returning how many were removed.
    ///
    /// Consumers already waiting in `dequeue` stay suspended.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let removed = inner.items.len();
        inner.items.clear();
        removed
    }
}

impl<T: Clone> TrackQueue<T> {
    /// The head of the queue, without removing it.
    pub fn peek(&self) -> MusicResult<T> {
        self.inner
            .lock()
            .items
            .front()
            .cloned()
            .ok_or(MusicError::EmptyQueue)
    }

    /// The item at a zero-based position, if there is one.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.lock().items.get(index).cloned()
    }

    /// A point-in-time copy of the queue, in order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().items.iter().cloned().collect()
    }

    /// A one-based page of the queue, `per_page` items long.
    pub fn page(&self, page: usize, per_page: usize) -> MusicResult<QueuePage<T>> {
        let per_page = per_page.max(1);
        let inner = self.inner.lock();
        let total_len = inner.items.len();
        if total_len == 0 {
            return Err(MusicError::EmptyQueue);
        }

        let total_pages = total_len.div_ceil(per_page);
        if page == 0 || page > total_pages {
            return Err(MusicError::IndexOutOfRange {
                index: page,
                len: total_pages,
            });
        }

        let offset = (page - 1) * per_page;
        Ok(QueuePage {
            items: inner
                .items
                .iter()
                .skip(offset)
                .take(per_page)
                .cloned()
                .collect(),
            offset,
            page,
            total_pages,
            total_len,
        })
    }
}

impl TrackQueue<TrackMetadata> {
    /// Sum of the known durations of every queued track.
    pub fn total_duration(&self) -> Duration {
        self.inner
            .lock()
            .items
            .iter()
            .filter_map(|track| track.duration)
            .sum()
    }
}
