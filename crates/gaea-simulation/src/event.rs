use gaea_core::creature::{Activity, Want};
use gaea_core::entity::EntityId;

use crate::query::QueryPurpose;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Needs
    /// A creature developed a need.
    NeedAdded {
        /// The creature.
        entity: EntityId,
        /// What it wants.
        want: Want,
    },
    /// A need was satisfied and removed.
    NeedSatisfied {
        /// The creature.
        entity: EntityId,
        /// What it wanted.
        want: Want,
    },

    // Behaviour
    /// A creature switched activity.
    ActivityChanged {
        /// The creature.
        entity: EntityId,
        /// Previous activity.
        from: Activity,
        /// New activity.
        to: Activity,
    },
    /// A creature asked the spatial broker for tiles.
    QueryIssued {
        /// The creature.
        entity: EntityId,
        /// Sequence number of the query.
        event_id: u64,
        /// What the answer is for.
        purpose: QueryPurpose,
    },
    /// A response was ignored because the requester had moved on.
    StaleResponse {
        /// The creature.
        entity: EntityId,
        /// Sequence number of the ignored response.
        event_id: u64,
    },
    /// A creature picked a tile to walk to.
    TargetAcquired {
        /// The creature.
        entity: EntityId,
        /// The chosen tile.
        target: EntityId,
    },
    /// A creature reached its movement target.
    Arrived {
        /// The creature.
        entity: EntityId,
        /// The tile it reached.
        at: EntityId,
    },

    // World
    /// An object was placed in the world.
    Spawned {
        /// The new object.
        entity: EntityId,
    },
    /// An object was taken out of the world.
    TileRemoved {
        /// The removed object.
        entity: EntityId,
        /// The creature that exhausted it, if any.
        by: Option<EntityId>,
    },
    /// A tile was rebound to another object template.
    TileReplaced {
        /// The tile.
        entity: EntityId,
        /// New object template id.
        object_id: u32,
    },
    /// A plant moved on to its next growth stage.
    PlantMatured {
        /// The plant.
        entity: EntityId,
        /// Previous plant template id.
        from: u32,
        /// New plant template id.
        to: u32,
    },

    // Time
    /// The configured sunrise hour began.
    Sunrise,
    /// The configured sunset hour began.
    Sunset,
    /// Time was frozen.
    Paused,
    /// Time was unfrozen.
    Resumed,
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::NeedAdded { entity, .. }
            | Self::NeedSatisfied { entity, .. }
            | Self::ActivityChanged { entity, .. }
            | Self::QueryIssued { entity, .. }
            | Self::StaleResponse { entity, .. }
            | Self::Spawned { entity }
            | Self::TileReplaced { entity, .. }
            | Self::PlantMatured { entity, .. } => *entity == id,
            Self::TargetAcquired { entity, target } => *entity == id || *target == id,
            Self::Arrived { entity, at } => *entity == id || *at == id,
            Self::TileRemoved { entity, by } => *entity == id || *by == Some(id),
            Self::Sunrise | Self::Sunset | Self::Paused | Self::Resumed => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// Virtual second when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Count events matching a predicate on their kind.
    pub fn count(&self, mut predicate: impl FnMut(&SimEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(&e.kind)).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
