//! Event types and sinks for observing station placement.
//!
//! This module defines [`PlacementEvent`] and a set of sinks to emit, collect, or forward
//! events while running [`crate::placement::PlacementEngine::initial_placement_with_events`]
//! or [`crate::placement::PlacementEngine::place_one_with_events`].
use glam::Vec2;

use crate::station::{Station, StationShape};

/// Describes events emitted by placement operations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted once the initial grid candidate set has been built.
    CandidatesBuilt {
        /// Lattice points before the river filter.
        lattice_points: usize,
        /// Candidates left after removing points near the river.
        candidates: usize,
    },

    /// Emitted when a station is created.
    StationPlaced {
        /// The new station.
        station: Station,
        /// Candidates left after consuming the station's point.
        remaining: usize,
    },

    /// Emitted when an initial shape could not be placed.
    ShapeSkipped {
        /// The shape that got no station.
        shape: StationShape,
    },

    /// Emitted when no candidate passes validation.
    NoCapacity {
        /// Candidates that remain but are all blocked.
        remaining: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. operation name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PlacementEvent`], used to filter what a sink receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    CandidatesBuilt,
    StationPlaced,
    ShapeSkipped,
    NoCapacity,
    Warning,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            PlacementEvent::CandidatesBuilt { .. } => PlacementEventKind::CandidatesBuilt,
            PlacementEvent::StationPlaced { .. } => PlacementEventKind::StationPlaced,
            PlacementEvent::ShapeSkipped { .. } => PlacementEventKind::ShapeSkipped,
            PlacementEvent::NoCapacity { .. } => PlacementEventKind::NoCapacity,
            PlacementEvent::Warning { .. } => PlacementEventKind::Warning,
        }
    }

    /// Position of the placed station, if this event placed one.
    pub fn placed_at(&self) -> Option<Vec2> {
        match self {
            PlacementEvent::StationPlaced { station, .. } => Some(station.position()),
            _ => None,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Whether the sink cares about events of `kind`. Producers skip building events that
    /// are not wanted.
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: PlacementEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> PlacementEvent {
        PlacementEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(PlacementEvent::NoCapacity { remaining: 2 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(PlacementEventKind::NoCapacity), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(PlacementEventKind::StationPlaced));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }

    #[test]
    fn placed_at_reports_station_position() {
        let station = Station::new(Vec2::new(3.0, 4.0), StationShape::Square);
        let event = PlacementEvent::StationPlaced {
            station,
            remaining: 0,
        };
        assert_eq!(event.placed_at(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(warning("x").placed_at(), None);
    }
}
