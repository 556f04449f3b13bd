use keyed_priority_queue::KeyedPriorityQueue;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use thiserror::Error;

use super::state::{ProcessId, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
}

impl EventKind {
    // Lower runs first when two events share a timestamp
    fn precedence(self) -> u8 {
        match self {
            Self::Departure => 0,
            Self::Arrival => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: SimTime,
    pub kind: EventKind,
    pub process: ProcessId,
    pub seq: u64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("pop from an empty event queue")]
pub struct EmptyQueueError;

// KeyedPriorityQueue is a max-heap, so the ordering is reversed: the earliest
// event compares greatest.
#[derive(Debug, Clone, Copy)]
struct Pending(Event);

impl Pending {
    fn key(&self) -> (OrderedFloat<SimTime>, u8, u64) {
        (
            OrderedFloat(self.0.time),
            self.0.kind.precedence(),
            self.0.seq,
        )
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Pending events ordered by time, then departures before arrivals, then
/// insertion order.
#[derive(Debug)]
pub struct EventQueue {
    pending: KeyedPriorityQueue<u64, Pending>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn insert(&mut self, time: SimTime, kind: EventKind, process: ProcessId) -> Event {
        assert!(
            time.is_finite() && time >= 0.0,
            "Event scheduled at invalid time {time}"
        );

        let seq = self.next_seq;
        self.next_seq += 1;

        let event = Event {
            time,
            kind,
            process,
            seq,
        };
        let displaced = self.pending.push(seq, Pending(event));
        debug_assert!(displaced.is_none(), "Event sequence {seq} reused");
        event
    }

    pub fn pop_earliest(&mut self) -> Result<Event, EmptyQueueError> {
        self.pending
            .pop()
            .map(|(_, Pending(event))| event)
            .ok_or(EmptyQueueError)
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.pending.peek().map(|(_, pending)| pending.0.time)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending = KeyedPriorityQueue::new();
        self.next_seq = 0;
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
