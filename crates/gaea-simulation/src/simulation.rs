use gaea_core::calendar::CalendarTime;
use gaea_core::content::ContentRegistry;
use gaea_core::entity::EntityId;
use gaea_core::geometry::{Aabb, Point};
use gaea_core::save::SaveFile;
use gaea_core::world::World;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::TimeDriver;
use crate::config::SimConfig;
use crate::context::{SimContext, SimState};
use crate::creature::CreatureSystem;
use crate::debug::DebugOverlay;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::plant::PlantSystem;
use crate::query::QueryBroker;
use crate::spatial::SpatialIndex;
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the world, content, time driver, spatial index, query broker, event
/// log and systems. Each tick first delivers the answers to last tick's
/// spatial queries, then runs creatures, plants and any registered systems.
pub struct Simulation {
    content: ContentRegistry,
    config: SimConfig,
    driver: TimeDriver,
    state: SimState,
    creatures: CreatureSystem,
    plants: PlantSystem,
    systems: Vec<Box<dyn System>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.driver.time().seconds_since_beginning)
            .field("paused", &self.driver.is_paused())
            .field("tiles", &self.state.world.tile_count())
            .field("systems", &self.systems.len())
            .field("events", &self.state.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation over `world`, indexing every tile it contains.
    pub fn new(world: World, content: ContentRegistry, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let bounds = Aabb::new(
            Point::new(0.0, 0.0),
            Point::new(config.world_size, config.world_size),
        );
        let mut index = SpatialIndex::new(bounds, config.quadtree_capacity, config.quadtree_max_depth);
        for (id, tile) in world.tiles() {
            index.insert(id, tile.aabb());
        }
        tracing::info!(
            tiles = world.tile_count(),
            creatures = world.creature_count(),
            plants = world.plant_count(),
            seed = config.seed,
            "simulation created"
        );

        let state = SimState {
            world,
            index,
            broker: QueryBroker::new(),
            debug: DebugOverlay::new(config.debug_overlay, config.debug_ttl_secs),
            events: EventLog::new(config.max_events),
            rng: StdRng::seed_from_u64(config.seed),
        };
        Ok(Self {
            content,
            config,
            driver: TimeDriver::default(),
            state,
            creatures: CreatureSystem::new(),
            plants: PlantSystem::new(),
            systems: Vec::new(),
        })
    }

    /// Resume a saved game. The calendar continues from the saved time.
    pub fn from_save(save: &SaveFile, content: ContentRegistry, config: SimConfig) -> SimResult<Self> {
        let world = save.restore(&content)?;
        let sim = Self::new(world, content, config)?;
        Ok(sim.with_start_time(save.time.unwrap_or_default()))
    }

    /// Start the calendar at `time` instead of the beginning.
    pub fn with_start_time(mut self, time: CalendarTime) -> Self {
        self.driver = TimeDriver::new(time);
        self
    }

    /// Snapshot the world and calendar.
    pub fn save(&self) -> SaveFile {
        SaveFile::capture(&self.state.world, Some(self.driver.time()))
    }

    /// Register an extra system. It runs after creatures and plants, in
    /// registration order.
    pub fn add_system<S: System + 'static>(&mut self, mut system: S) -> SimResult<()> {
        let mut ctx = self
            .state
            .context(&self.content, &self.config, self.driver.time());
        system.init(&mut ctx)?;
        tracing::debug!(system = system.name(), "system registered");
        self.systems.push(Box::new(system));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Place a plain tile and index it.
    pub fn spawn_tile(&mut self, object_id: u32, position: Point, layer: f32) -> SimResult<EntityId> {
        let id = self
            .state
            .world
            .spawn_tile(&self.content, object_id, position, layer)?;
        self.register(id)?;
        Ok(id)
    }

    /// Place a creature of the given species and index it.
    pub fn spawn_creature(&mut self, species_id: u32, position: Point) -> SimResult<EntityId> {
        let id = self
            .state
            .world
            .spawn_creature(&self.content, species_id, position)?;
        self.register(id)?;
        Ok(id)
    }

    /// Place a plant at the given growth stage and index it.
    pub fn spawn_plant(&mut self, plant_id: u32, position: Point) -> SimResult<EntityId> {
        let id = self
            .state
            .world
            .spawn_plant(&self.content, plant_id, position)?;
        self.register(id)?;
        Ok(id)
    }

    /// Remove an object from the world and the index.
    ///
    /// Returns `false` if it was already gone.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let mut ctx = self
            .state
            .context(&self.content, &self.config, self.driver.time());
        ctx.remove_tile(id, None)
    }

    fn register(&mut self, id: EntityId) -> SimResult<()> {
        let tile = self.state.world.tile(id).ok_or(SimError::EntityNotFound(id))?;
        let aabb = tile.aabb();
        let description = format!("{id} appeared {}", tile.position_text().to_lowercase());
        self.state.index.insert(id, aabb);
        self.emit(SimEventKind::Spawned { entity: id }, description);
        Ok(())
    }

    fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        let now = self.driver.time().seconds_since_beginning;
        self.state.events.push(SimEvent::new(now, kind, description));
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Feed real elapsed seconds. Returns whether a tick ran.
    pub fn advance(&mut self, real_dt: f32) -> SimResult<bool> {
        match self.driver.advance(real_dt) {
            Some(time) => self.run_tick(time).map(|()| true),
            None => Ok(false),
        }
    }

    /// Run exactly one tick, even while paused.
    pub fn step(&mut self) -> SimResult<()> {
        let time = self.driver.step();
        self.run_tick(time)
    }

    /// Run `n` ticks back to back.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Freeze time. Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        if !self.driver.pause() {
            return false;
        }
        tracing::info!("paused");
        self.emit(SimEventKind::Paused, "Paused");
        true
    }

    /// Unfreeze time. Returns `false` if not paused.
    pub fn resume(&mut self) -> bool {
        if !self.driver.resume() {
            return false;
        }
        tracing::info!(speed = self.driver.speed(), "resumed");
        self.emit(SimEventKind::Resumed, "Resumed");
        true
    }

    /// Flip between paused and running. Returns whether time is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        if self.driver.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.driver.is_paused()
    }

    /// Change the number of virtual seconds per real second.
    pub fn set_speed(&mut self, speed: f32) {
        self.driver.set_speed(speed);
    }

    fn run_tick(&mut self, time: CalendarTime) -> SimResult<()> {
        let responses = self.state.broker.process(
            &self.state.index,
            &self.state.world,
            &mut self.state.debug,
            time.seconds_since_beginning,
        );

        let mut ctx = self.state.context(&self.content, &self.config, time);
        if time.is_start_of_hour(ctx.config.sunrise_hour) {
            ctx.emit(SimEventKind::Sunrise, "The sun rises");
        }
        if time.is_start_of_hour(ctx.config.sunset_hour) {
            ctx.emit(SimEventKind::Sunset, "The sun sets");
        }

        for response in responses {
            self.creatures.handle_response(&mut ctx, response);
        }
        self.creatures.tick(&mut ctx)?;
        self.plants.tick(&mut ctx)?;
        for system in &mut self.systems {
            system.tick(&mut ctx)?;
        }

        ctx.debug.prune(time.seconds_since_beginning);
        tracing::trace!(time = time.seconds_since_beginning, "tick complete");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// World objects.
    pub fn world(&self) -> &World {
        &self.state.world
    }

    /// Direct world access. The spatial index is not updated.
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.state.world
    }

    /// Static content.
    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    /// Run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current calendar time.
    pub fn time(&self) -> CalendarTime {
        self.driver.time()
    }

    /// Whether time is frozen.
    pub fn is_paused(&self) -> bool {
        self.driver.is_paused()
    }

    /// Virtual seconds per real second.
    pub fn speed(&self) -> f32 {
        self.driver.speed()
    }

    /// Recorded events.
    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    /// Spatial index over every tile.
    pub fn index(&self) -> &SpatialIndex {
        &self.state.index
    }

    /// Debug overlay.
    pub fn debug(&self) -> &DebugOverlay {
        &self.state.debug
    }

    /// Turn the debug overlay on or off.
    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.state.debug.set_enabled(enabled);
    }

    /// Spatial queries waiting for the next tick.
    pub fn pending_queries(&self) -> usize {
        self.state.broker.pending()
    }

    /// Spatial queries issued by creatures so far.
    pub fn queries_issued(&self) -> u64 {
        self.creatures.queries_issued()
    }

    /// Names of every system in tick order.
    pub fn system_names(&self) -> Vec<&str> {
        let mut names = vec![self.creatures.name(), self.plants.name()];
        names.extend(self.systems.iter().map(|s| s.name()));
        names
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use gaea_core::creature::Activity;
    use gaea_core::tile::VEGETATION_LAYER;
    use rand::SeedableRng;

    use super::*;
    use crate::worldgen::{self, WorldGenConfig};

    fn content() -> ContentRegistry {
        ContentRegistry::bundled().unwrap()
    }

    fn empty_sim(config: SimConfig) -> Simulation {
        Simulation::new(World::new(), content(), config).unwrap()
    }

    fn quiet() -> SimConfig {
        SimConfig::default().with_wander_roll(0.0, 0.0)
    }

    fn generated(seed: u64) -> Simulation {
        let config = WorldGenConfig::default().with_size(8, 8);
        let world = worldgen::generate(&content(), &config, &mut StdRng::seed_from_u64(seed)).unwrap();
        Simulation::new(world, content(), SimConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn new_indexes_every_tile() {
        let sim = generated(1);
        assert_eq!(sim.index().len(), sim.world().tile_count());
        assert_eq!(sim.system_names(), vec!["creatures", "plants"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig::default().with_world_size(0.0);
        assert!(matches!(
            Simulation::new(World::new(), content(), config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn spawning_indexes_and_records() {
        let mut sim = empty_sim(quiet());
        let id = sim.spawn_creature(1, Point::new(64.0, 64.0)).unwrap();
        assert!(sim.index().contains(id));
        assert_eq!(
            sim.events()
                .count(|k| matches!(k, SimEventKind::Spawned { entity } if *entity == id)),
            1
        );
        assert!(sim.spawn_creature(99, Point::default()).is_err());
        assert_eq!(sim.world().tile_count(), 1);
    }

    #[test]
    fn remove_entity_is_idempotent() {
        let mut sim = empty_sim(quiet());
        let id = sim.spawn_plant(1, Point::default()).unwrap();
        assert!(sim.remove_entity(id));
        assert!(!sim.remove_entity(id));
        assert!(!sim.index().contains(id));
        assert_eq!(
            sim.events()
                .count(|k| matches!(k, SimEventKind::TileRemoved { .. })),
            1
        );
    }

    #[test]
    fn real_time_drives_ticks() {
        let mut sim = empty_sim(quiet());
        assert!(sim.advance(1.0).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 1);

        assert!(sim.pause());
        assert!(!sim.advance(10.0).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 1);

        assert!(sim.resume());
        assert!(sim.advance(1.0).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 2);

        sim.set_speed(3.0);
        assert!(!sim.advance(0.25).unwrap());
        assert!(sim.advance(0.25).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 3);
    }

    #[test]
    fn bad_frames_never_stall_the_clock() {
        let mut sim = empty_sim(quiet());
        assert!(!sim.advance(f32::NAN).unwrap());
        assert!(sim.advance(1.0).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 1);

        assert!(sim.advance(1e8).unwrap());
        assert_eq!(sim.time().seconds_since_beginning, 2);
    }

    #[test]
    fn pause_events_and_toggle() {
        let mut sim = empty_sim(quiet());
        assert!(sim.toggle_pause());
        assert!(!sim.pause());
        assert!(!sim.toggle_pause());
        assert!(!sim.resume());
        assert_eq!(sim.events().count(|k| matches!(k, SimEventKind::Paused)), 1);
        assert_eq!(sim.events().count(|k| matches!(k, SimEventKind::Resumed)), 1);
    }

    #[test]
    fn sunrise_and_sunset_fire_on_the_hour() {
        let mut sim = empty_sim(quiet()).with_start_time(CalendarTime::from_seconds(6 * 3600 - 2));
        sim.run(3).unwrap();
        assert_eq!(sim.events().count(|k| matches!(k, SimEventKind::Sunrise)), 1);
        assert_eq!(sim.events().count(|k| matches!(k, SimEventKind::Sunset)), 0);

        let mut sim = empty_sim(quiet()).with_start_time(CalendarTime::from_seconds(20 * 3600 - 1));
        sim.step().unwrap();
        assert_eq!(sim.events().count(|k| matches!(k, SimEventKind::Sunset)), 1);
    }

    #[test]
    fn creature_eats_a_tile_to_exhaustion() {
        let mut sim = empty_sim(quiet());
        let rabbit = sim.spawn_creature(1, Point::new(0.0, 0.0)).unwrap();
        let grass = sim
            .spawn_tile(3, Point::new(32.0, 0.0), VEGETATION_LAYER)
            .unwrap();
        if let Some(creature) = sim.world_mut().creature_mut(rabbit) {
            creature.food = 5.0;
        }

        let mut ticks = 0;
        while sim.world().contains(grass) && ticks < 100 {
            sim.step().unwrap();
            ticks += 1;
        }
        assert!(!sim.world().contains(grass), "grass survived {ticks} ticks");
        assert!(!sim.index().contains(grass));

        // Never found again.
        sim.run(50).unwrap();
        assert_eq!(
            sim.events().count(|k| matches!(
                k,
                SimEventKind::TileRemoved { entity, by: Some(by) } if *entity == grass && *by == rabbit
            )),
            1
        );
        assert_eq!(
            sim.events()
                .count(|k| matches!(k, SimEventKind::TargetAcquired { target, .. } if *target == grass)),
            1
        );
        let creature = sim.world().creature(rabbit).unwrap();
        assert_ne!(creature.activity, Activity::Eating);
        assert!(creature.food > 5.0);
    }

    #[test]
    fn plants_mature_inside_the_simulation() {
        let mut sim = empty_sim(quiet());
        let id = sim.spawn_plant(1, Point::default()).unwrap();
        sim.run(121).unwrap();
        let plant = sim.world().plant(id).unwrap();
        assert_eq!(plant.plant_id, 2);
        assert_eq!(sim.world().tile(id).unwrap().object_id, 6);
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut sim = generated(4);
        sim.run(5).unwrap();
        let save = sim.save();
        assert_eq!(save.entity_count(), sim.world().tile_count());

        let json = save.to_json().unwrap();
        let loaded = SaveFile::from_json(&json).unwrap();
        let restored = Simulation::from_save(&loaded, content(), SimConfig::default()).unwrap();

        assert_eq!(restored.time(), sim.time());
        assert_eq!(restored.world().tile_count(), sim.world().tile_count());
        assert_eq!(restored.world().creature_count(), sim.world().creature_count());
        assert_eq!(restored.world().plant_count(), sim.world().plant_count());
        assert_eq!(restored.index().len(), restored.world().tile_count());

        let tuples = |s: &Simulation| {
            let mut v: Vec<_> = s
                .world()
                .tiles()
                .map(|(id, t)| (id, t.object_id, t.position, t.layer, t.accessible_resource))
                .collect();
            v.sort_by_key(|(id, ..)| *id);
            v
        };
        assert_eq!(tuples(&restored), tuples(&sim));
    }

    #[test]
    fn loaded_creature_asks_again() {
        let mut sim = empty_sim(quiet());
        let rabbit = sim.spawn_creature(1, Point::default()).unwrap();
        if let Some(creature) = sim.world_mut().creature_mut(rabbit) {
            creature.food = 5.0;
        }
        sim.step().unwrap();
        assert_eq!(sim.pending_queries(), 1);

        let save = sim.save();
        let mut restored = Simulation::from_save(&save, content(), quiet()).unwrap();
        assert_eq!(restored.pending_queries(), 0);
        assert_eq!(
            restored.world().creature(rabbit).unwrap().activity,
            Activity::Idle
        );
        restored.step().unwrap();
        assert_eq!(restored.pending_queries(), 1);
    }

    #[test]
    fn same_seed_same_story() {
        let story = || {
            let mut sim = generated(7);
            sim.run(60).unwrap();
            sim.events()
                .events()
                .iter()
                .map(|e| e.description.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(story(), story());
    }

    #[test]
    fn debug_overlay_expires_shapes() {
        let mut sim = empty_sim(quiet().with_debug_overlay(true));
        let rabbit = sim.spawn_creature(1, Point::default()).unwrap();
        if let Some(creature) = sim.world_mut().creature_mut(rabbit) {
            creature.food = 5.0;
        }
        sim.run(2).unwrap();
        assert!(!sim.debug().shapes().is_empty());

        sim.set_debug_overlay(false);
        assert!(sim.debug().shapes().is_empty());
    }

    #[test]
    fn custom_system_registration() {
        #[derive(Debug)]
        struct Counter {
            inits: Rc<Cell<u32>>,
            ticks: Rc<Cell<u32>>,
        }
        impl System for Counter {
            fn name(&self) -> &str {
                "counter"
            }
            fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
                self.ticks.set(self.ticks.get() + 1);
                Ok(())
            }
            fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
                self.inits.set(self.inits.get() + 1);
                Ok(())
            }
        }

        let inits = Rc::new(Cell::new(0));
        let ticks = Rc::new(Cell::new(0));
        let mut sim = empty_sim(quiet());
        sim.add_system(Counter {
            inits: Rc::clone(&inits),
            ticks: Rc::clone(&ticks),
        })
        .unwrap();
        sim.run(3).unwrap();

        assert_eq!(inits.get(), 1);
        assert_eq!(ticks.get(), 3);
        assert_eq!(sim.system_names(), vec!["creatures", "plants", "counter"]);
    }

    #[test]
    fn empty_world_no_crash() {
        let mut sim = empty_sim(SimConfig::default());
        sim.run(100).unwrap();
        assert_eq!(sim.time().seconds_since_beginning, 100);
        assert!(sim.events().is_empty());
    }
}
