use gaea_core::calendar::CalendarTime;
use gaea_core::content::ContentRegistry;
use gaea_core::entity::EntityId;
use gaea_core::geometry::Aabb;
use gaea_core::world::World;
use rand::rngs::StdRng;

use crate::clock::SECONDS_PER_TICK;
use crate::config::SimConfig;
use crate::debug::{DebugColor, DebugOverlay};
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::query::QueryBroker;
use crate::spatial::SpatialIndex;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// World objects.
    pub world: &'a mut World,
    /// Static content.
    pub content: &'a ContentRegistry,
    /// Run configuration.
    pub config: &'a SimConfig,
    /// Spatial index over every tile.
    pub index: &'a mut SpatialIndex,
    /// Pending spatial queries.
    pub broker: &'a mut QueryBroker,
    /// Debug shapes.
    pub debug: &'a mut DebugOverlay,
    /// Event log.
    pub events: &'a mut EventLog,
    /// Deterministic RNG.
    pub rng: &'a mut StdRng,
    /// Calendar at this tick.
    pub time: CalendarTime,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(SimEvent::new(self.now(), kind, description));
    }

    /// Virtual seconds since the beginning of time.
    pub fn now(&self) -> u64 {
        self.time.seconds_since_beginning
    }

    /// Virtual seconds covered by this tick.
    pub fn dt(&self) -> f32 {
        SECONDS_PER_TICK
    }

    /// Record a debug shape if the overlay is enabled.
    pub fn publish_debug(&mut self, area: Aabb, color: DebugColor) {
        let now = self.now();
        self.debug.publish(area, color, now);
    }

    /// Take an object out of the world and the index.
    ///
    /// Returns `false` if it was already gone; the removal event is emitted
    /// only the first time.
    pub fn remove_tile(&mut self, id: EntityId, by: Option<EntityId>) -> bool {
        self.index.remove(id);
        if self.world.remove(id).is_none() {
            tracing::debug!(%id, "tile already removed");
            return false;
        }
        let description = match by {
            Some(by) => format!("{id} was exhausted by {by}"),
            None => format!("{id} was removed"),
        };
        self.emit(SimEventKind::TileRemoved { entity: id, by }, description);
        true
    }

    /// Rebind a tile to another object template.
    ///
    /// An unknown object id is an error; a tile that no longer exists is
    /// skipped with a warning and `Ok(false)`.
    pub fn replace_tile(&mut self, id: EntityId, object_id: u32) -> SimResult<bool> {
        let content = self.content;
        let object = content.object(object_id)?;
        let Some(tile) = self.world.tile_mut(id) else {
            tracing::warn!(%id, object_id, "cannot replace a tile that no longer exists");
            return Ok(false);
        };
        tile.rebind(object);
        self.emit(
            SimEventKind::TileReplaced {
                entity: id,
                object_id,
            },
            format!("{id} is now {}", object.name),
        );
        Ok(true)
    }
}

/// Everything a tick mutates, grouped so a [`SimContext`] can borrow it
/// alongside the systems that run against it.
#[derive(Debug)]
pub(crate) struct SimState {
    pub(crate) world: World,
    pub(crate) index: SpatialIndex,
    pub(crate) broker: QueryBroker,
    pub(crate) debug: DebugOverlay,
    pub(crate) events: EventLog,
    pub(crate) rng: StdRng,
}

impl SimState {
    pub(crate) fn context<'a>(
        &'a mut self,
        content: &'a ContentRegistry,
        config: &'a SimConfig,
        time: CalendarTime,
    ) -> SimContext<'a> {
        SimContext {
            world: &mut self.world,
            content,
            config,
            index: &mut self.index,
            broker: &mut self.broker,
            debug: &mut self.debug,
            events: &mut self.events,
            rng: &mut self.rng,
            time,
        }
    }
}
