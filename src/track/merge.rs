// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Merging explicitly timed events into a track.

use tracing::{debug, trace};

use super::Track;
use crate::events::{EventError, EventKind, TrackEvent, TrackItem};

impl Track {
    /// Splice the explicit-tick queue into the event sequence and re-encode.
    ///
    /// Does nothing when the queue is empty.
    pub fn merge_explicit_tick_events(&mut self) -> Result<&mut Self, EventError> {
        if self.explicit_tick_events.is_empty() {
            return Ok(self);
        }
        self.assign_times();
        self.splice_pending()?;
        self.materialize()?;
        Ok(self)
    }

    /// Insert one event at its absolute tick, keeping the sequence ordered.
    ///
    /// An event without a tick is appended as if added normally. Events at
    /// the same tick keep their insertion order, except that tempo changes
    /// come first: a new tempo event goes after the tempo events already at
    /// its tick, and any other event lands directly after them.
    pub fn merge_single_event(&mut self, event: TrackEvent) -> &mut Self {
        if event.tick().is_none() {
            self.events.push(event);
            return self;
        }

        self.assign_times();
        let end = self.take_end_marker();
        self.splice(event);
        self.restore_end_marker(end);
        self
    }

    /// Merge every event of `other` into this track by absolute tick.
    ///
    /// Both tracks are built first, so each side's relative timing is
    /// resolved on its own before the two timelines are combined.
    pub fn merge_track(&mut self, other: &mut Track) -> Result<&mut Self, EventError> {
        self.build()?;
        other.build()?;

        let end = self.take_end_marker();
        let mut merged = 0;
        for event in other.events.iter().filter(|event| !event.is_end_of_track()) {
            self.splice(event.clone());
            merged += 1;
        }
        self.restore_end_marker(end);
        self.materialize()?;

        debug!(
            merged,
            events = self.events.len(),
            "merged track"
        );
        Ok(self)
    }

    /// Expand and splice every queued item, emptying the queue.
    ///
    /// Items are taken in tick order, ties in insertion order. All notes are
    /// expanded before anything is spliced, so an error leaves the track
    /// untouched.
    pub(super) fn splice_pending(&mut self) -> Result<(), EventError> {
        if self.explicit_tick_events.is_empty() {
            return Ok(());
        }

        let mut pending: Vec<&TrackItem> = self.explicit_tick_events.iter().collect();
        pending.sort_by_key(|item| item.explicit_tick().unwrap_or_default());

        let mut staged = Vec::new();
        for item in pending {
            match item {
                TrackItem::Note(note) => {
                    let start = note.start_tick().unwrap_or_default();
                    staged.extend(note.expand_absolute(start, &self.config)?);
                }
                TrackItem::Event(event) => staged.push(event.clone()),
            }
        }

        debug!(
            items = self.explicit_tick_events.len(),
            events = staged.len(),
            "merging explicitly timed events"
        );
        self.explicit_tick_events.clear();

        let end = self.take_end_marker();
        for event in staged {
            self.splice(event);
        }
        self.restore_end_marker(end);
        Ok(())
    }

    /// Insert a timed event into the ordered sequence and fix the deltas
    /// from the insertion point on
    fn splice(&mut self, mut event: TrackEvent) {
        let tick = event.tick().unwrap_or_default();
        let index = self.insertion_index(tick, event.kind());

        let previous = match index {
            0 => 0,
            i => self.events[i - 1].tick().unwrap_or_default(),
        };
        event.set_delta(super::delta_between(previous, tick));
        self.events.insert(index, event);
        self.refresh_deltas_from(index + 1);

        trace!(tick, index, "spliced event");
    }

    /// Position at which an event at `tick` is inserted.
    ///
    /// Scans for the last event at or before `tick`. Tempo events exactly
    /// at `tick` end the scan, so the new event lands right after the last
    /// of them. A tempo event being inserted passes those and stops before
    /// other events at its tick.
    fn insertion_index(&self, tick: u64, kind: EventKind) -> usize {
        let is_tempo_at = |i: usize| {
            self.events.get(i).is_some_and(|event| {
                event.tick().unwrap_or_default() == tick && event.kind() == EventKind::Tempo
            })
        };
        let mut after = None;

        for (i, existing) in self.events.iter().enumerate() {
            let existing_tick = existing.tick().unwrap_or_default();
            if existing_tick > tick {
                break;
            }
            if existing_tick == tick {
                if existing.kind() == EventKind::Tempo {
                    after = Some(i);
                    if kind != EventKind::Tempo && !is_tempo_at(i + 1) {
                        break;
                    }
                    continue;
                }
                if kind == EventKind::Tempo {
                    break;
                }
            }
            after = Some(i);
        }

        after.map_or(0, |i| i + 1)
    }

    /// Detach a trailing end-of-track marker
    fn take_end_marker(&mut self) -> Option<TrackEvent> {
        match self.events.last() {
            Some(last) if last.is_end_of_track() => self.events.pop(),
            _ => None,
        }
    }

    /// Re-attach an end-of-track marker after the last event
    fn restore_end_marker(&mut self, end: Option<TrackEvent>) {
        let Some(mut end) = end else {
            return;
        };

        let last_tick = self.events.last().and_then(TrackEvent::tick).unwrap_or_default();
        let tick = end.tick().unwrap_or_default().max(last_tick);
        end.set_tick(tick);
        end.set_delta(super::delta_between(last_tick, tick));
        self.events.push(end);
    }
}
