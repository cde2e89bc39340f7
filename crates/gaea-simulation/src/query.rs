//! Asynchronous spatial queries.
//!
//! Creatures never hold references into the world. They describe what they
//! are looking for in a [`SpatialRequest`] and hand it to the
//! [`QueryBroker`]. Submitting returns immediately; the broker answers all
//! pending requests in one batch and the simulation delivers the resulting
//! [`SpatialResponse`]s on the following tick.

use std::fmt;

use gaea_core::entity::EntityId;
use gaea_core::geometry::Aabb;
use gaea_core::tile::Tile;
use gaea_core::world::World;

use crate::debug::{DebugColor, DebugOverlay};
use crate::spatial::SpatialIndex;

/// Predicate applied to every candidate tile.
pub type TileFilter = Box<dyn Fn(&Tile) -> bool>;

/// Why a query was issued, so the requester can tell whether the answer still matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryPurpose {
    /// Looking for something to eat.
    Forage,
    /// Looking for somewhere to walk to.
    Wander,
}

/// A request for the ids of tiles in an area that satisfy a filter.
pub struct SpatialRequest {
    /// Entity that asked.
    pub origin: EntityId,
    /// Per-origin sequence number used to recognise stale answers.
    pub event_id: u64,
    /// Area to search.
    pub area: Aabb,
    /// What the answer will be used for.
    pub purpose: QueryPurpose,
    filter: TileFilter,
}

impl SpatialRequest {
    /// A request whose results must satisfy `filter`.
    pub fn new(
        origin: EntityId,
        event_id: u64,
        area: Aabb,
        purpose: QueryPurpose,
        filter: impl Fn(&Tile) -> bool + 'static,
    ) -> Self {
        Self {
            origin,
            event_id,
            area,
            purpose,
            filter: Box::new(filter),
        }
    }

    /// A request that accepts every tile in the area.
    pub fn unfiltered(origin: EntityId, event_id: u64, area: Aabb, purpose: QueryPurpose) -> Self {
        Self::new(origin, event_id, area, purpose, |_| true)
    }

    /// Whether `tile` passes the request's filter.
    pub fn matches(&self, tile: &Tile) -> bool {
        (self.filter)(tile)
    }
}

impl fmt::Debug for SpatialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialRequest")
            .field("origin", &self.origin)
            .field("event_id", &self.event_id)
            .field("area", &self.area)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}

/// The answer to a [`SpatialRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialResponse {
    /// Entity that asked.
    pub origin: EntityId,
    /// Sequence number copied from the request.
    pub event_id: u64,
    /// Area that was searched.
    pub area: Aabb,
    /// Purpose copied from the request.
    pub purpose: QueryPurpose,
    /// Matching tiles, in no particular order.
    pub results: Vec<EntityId>,
}

/// Queue of pending spatial requests.
#[derive(Debug, Default)]
pub struct QueryBroker {
    pending: Vec<SpatialRequest>,
    answered: u64,
}

impl QueryBroker {
    /// An empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Never blocks and never fails.
    pub fn submit(&mut self, request: SpatialRequest) {
        tracing::trace!(origin = %request.origin, event_id = request.event_id, "query submitted");
        self.pending.push(request);
    }

    /// Number of requests waiting for an answer.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total number of requests answered so far.
    pub fn answered(&self) -> u64 {
        self.answered
    }

    /// Answer every pending request against the index.
    ///
    /// Index entries without a tile in `world` are skipped. When the overlay
    /// is enabled, the searched area and every result are published.
    pub fn process(
        &mut self,
        index: &SpatialIndex,
        world: &World,
        debug: &mut DebugOverlay,
        now: u64,
    ) -> Vec<SpatialResponse> {
        let requests = std::mem::take(&mut self.pending);
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            let results = index.query(&request.area, |id| {
                world.tile(id).is_some_and(|tile| request.matches(tile))
            });

            debug.publish(request.area, DebugColor::Red, now);
            for id in &results {
                if let Some(tile) = world.tile(*id) {
                    debug.publish(tile.aabb(), DebugColor::Green, now);
                }
            }

            tracing::trace!(
                origin = %request.origin,
                event_id = request.event_id,
                results = results.len(),
                "query answered"
            );
            self.answered += 1;
            responses.push(SpatialResponse {
                origin: request.origin,
                event_id: request.event_id,
                area: request.area,
                purpose: request.purpose,
                results,
            });
        }
        responses
    }
}

#[cfg(test)]
mod tests {
    use gaea_core::content::ContentRegistry;
    use gaea_core::geometry::Point;
    use gaea_core::tile::{GROUND_LAYER, VEGETATION_LAYER};

    use super::*;

    fn setup() -> (World, SpatialIndex, EntityId, EntityId) {
        let content = ContentRegistry::bundled().unwrap();
        let mut world = World::new();
        let ground = world
            .spawn_tile(&content, 1, Point::new(0.0, 0.0), GROUND_LAYER)
            .unwrap();
        let grass = world
            .spawn_tile(&content, 3, Point::new(32.0, 0.0), VEGETATION_LAYER)
            .unwrap();
        let mut index = SpatialIndex::new(
            Aabb::new(Point::new(0.0, 0.0), Point::new(1024.0, 1024.0)),
            4,
            6,
        );
        for (id, tile) in world.tiles() {
            index.insert(id, tile.aabb());
        }
        (world, index, ground, grass)
    }

    #[test]
    fn submit_does_not_answer_immediately() {
        let mut broker = QueryBroker::new();
        broker.submit(SpatialRequest::unfiltered(
            EntityId(9),
            1,
            Aabb::default(),
            QueryPurpose::Wander,
        ));
        assert_eq!(broker.pending(), 1);
        assert_eq!(broker.answered(), 0);
    }

    #[test]
    fn process_applies_filter() {
        let (world, index, _, grass) = setup();
        let mut broker = QueryBroker::new();
        let mut debug = DebugOverlay::new(false, 3.0);
        broker.submit(SpatialRequest::new(
            EntityId(99),
            7,
            Aabb::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
            QueryPurpose::Forage,
            |tile| tile.offers_any(&[1]),
        ));
        let responses = broker.process(&index, &world, &mut debug, 0);
        assert_eq!(broker.pending(), 0);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].origin, EntityId(99));
        assert_eq!(responses[0].event_id, 7);
        assert_eq!(responses[0].purpose, QueryPurpose::Forage);
        assert_eq!(responses[0].results, vec![grass]);
    }

    #[test]
    fn overlapping_requests_are_answered_independently() {
        let (world, index, _, _) = setup();
        let mut broker = QueryBroker::new();
        let mut debug = DebugOverlay::new(false, 3.0);
        let area = Aabb::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        broker.submit(SpatialRequest::unfiltered(EntityId(1), 1, area, QueryPurpose::Wander));
        broker.submit(SpatialRequest::unfiltered(EntityId(2), 1, area, QueryPurpose::Wander));
        let responses = broker.process(&index, &world, &mut debug, 0);
        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.results.len() == 2));
        assert_eq!(broker.answered(), 2);
    }

    #[test]
    fn tiles_missing_from_world_are_skipped() {
        let (mut world, index, ground, grass) = setup();
        world.remove(grass);
        let mut broker = QueryBroker::new();
        let mut debug = DebugOverlay::new(false, 3.0);
        broker.submit(SpatialRequest::unfiltered(
            EntityId(1),
            1,
            index.bounds(),
            QueryPurpose::Wander,
        ));
        let responses = broker.process(&index, &world, &mut debug, 0);
        assert_eq!(responses[0].results, vec![ground]);
    }

    #[test]
    fn debug_overlay_receives_query_and_results() {
        let (world, index, _, _) = setup();
        let mut broker = QueryBroker::new();
        let mut debug = DebugOverlay::new(true, 3.0);
        broker.submit(SpatialRequest::unfiltered(
            EntityId(1),
            1,
            index.bounds(),
            QueryPurpose::Wander,
        ));
        broker.process(&index, &world, &mut debug, 5);
        let colors: Vec<_> = debug.shapes().iter().map(|s| s.color).collect();
        assert_eq!(colors.iter().filter(|c| **c == DebugColor::Red).count(), 1);
        assert_eq!(colors.iter().filter(|c| **c == DebugColor::Green).count(), 2);
    }
}
