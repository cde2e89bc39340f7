use gaea_core::entity::EntityId;
use gaea_core::plant::{Plant, PlantActivity};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Grows plants and advances them through their growth stages.
#[derive(Debug, Default)]
pub struct PlantSystem;

impl PlantSystem {
    /// A new plant system.
    pub fn new() -> Self {
        Self
    }

    fn update(ctx: &mut SimContext<'_>, id: EntityId, plant: &mut Plant) -> SimResult<()> {
        if plant.is_fully_grown()
            && let Some(grown_id) = plant.grown_id
        {
            let grown = ctx.content.plant(grown_id)?;
            let from = plant.plant_id;
            plant.mature_into(grown);
            tracing::debug!(%id, from, to = grown_id, "plant matured");
            ctx.emit(
                SimEventKind::PlantMatured {
                    entity: id,
                    from,
                    to: grown_id,
                },
                format!("{id} grew into {}", plant.name),
            );
            ctx.replace_tile(id, plant.object_id)?;
            return Ok(());
        }

        match plant.activity {
            PlantActivity::Growing => {
                let dt = ctx.dt();
                plant.growth += plant.growth_speed * dt;
                if let Some(resource) = ctx
                    .world
                    .tile_mut(id)
                    .and_then(|t| t.accessible_resource.as_mut())
                {
                    resource.amount += plant.growth_rate * dt;
                }
            }
            PlantActivity::Resting => {}
        }
        Ok(())
    }
}

impl System for PlantSystem {
    fn name(&self) -> &str {
        "plants"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for id in ctx.world.plant_ids() {
            let Some(mut plant) = ctx.world.take_plant(id) else {
                continue;
            };
            let result = Self::update(ctx, id, &mut plant);
            ctx.world.put_plant(id, plant);
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gaea_core::calendar::CalendarTime;
    use gaea_core::content::ContentRegistry;
    use gaea_core::geometry::{Aabb, Point};
    use gaea_core::world::World;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::SimConfig;
    use crate::context::SimState;
    use crate::debug::DebugOverlay;
    use crate::event::EventLog;
    use crate::query::QueryBroker;
    use crate::spatial::SpatialIndex;

    fn state() -> SimState {
        SimState {
            world: World::new(),
            index: SpatialIndex::new(
                Aabb::new(Point::new(0.0, 0.0), Point::new(512.0, 512.0)),
                4,
                4,
            ),
            broker: QueryBroker::new(),
            debug: DebugOverlay::new(false, 3.0),
            events: EventLog::new(0),
            rng: StdRng::seed_from_u64(0),
        }
    }

    fn run(state: &mut SimState, content: &ContentRegistry, ticks: usize) {
        let config = SimConfig::default();
        let mut system = PlantSystem::new();
        for _ in 0..ticks {
            let mut ctx = state.context(content, &config, CalendarTime::default());
            system.tick(&mut ctx).unwrap();
        }
    }

    fn edit(state: &mut SimState, id: EntityId, f: impl FnOnce(&mut Plant)) {
        let mut plant = state.world.take_plant(id).unwrap();
        f(&mut plant);
        state.world.put_plant(id, plant);
    }

    #[test]
    fn growing_plant_gains_growth_and_resource() {
        let content = ContentRegistry::bundled().unwrap();
        let mut state = state();
        let id = state.world.spawn_plant(&content, 1, Point::default()).unwrap();
        let amount = state.world.tile(id).unwrap().amount();

        run(&mut state, &content, 10);

        let plant = state.world.plant(id).unwrap();
        assert!((plant.growth - 10.0).abs() < 1e-4);
        let grown = state.world.tile(id).unwrap().amount();
        assert!((grown - amount - 0.5).abs() < 1e-4);
    }

    #[test]
    fn resting_plant_does_not_grow() {
        let content = ContentRegistry::bundled().unwrap();
        let mut state = state();
        let id = state.world.spawn_plant(&content, 1, Point::default()).unwrap();
        edit(&mut state, id, |p| p.activity = PlantActivity::Resting);

        run(&mut state, &content, 5);

        assert_eq!(state.world.plant(id).unwrap().growth, 0.0);
    }

    #[test]
    fn fully_grown_sprout_matures_once() {
        let content = ContentRegistry::bundled().unwrap();
        let mut state = state();
        let id = state.world.spawn_plant(&content, 1, Point::default()).unwrap();
        edit(&mut state, id, |p| p.growth = 120.0);

        run(&mut state, &content, 1);

        let plant = state.world.plant(id).unwrap();
        assert_eq!(plant.plant_id, 2);
        assert_eq!(plant.growth, 120.0);
        assert_eq!(plant.max_growth, 720.0);
        assert_eq!(state.world.tile(id).unwrap().object_id, 6);
        assert_eq!(
            state
                .events
                .count(|k| matches!(k, SimEventKind::PlantMatured { from: 1, to: 2, .. })),
            1
        );

        // Tall grass has no further stage and keeps growing.
        run(&mut state, &content, 3);
        assert_eq!(state.world.plant(id).unwrap().plant_id, 2);
        assert_eq!(
            state
                .events
                .count(|k| matches!(k, SimEventKind::PlantMatured { .. })),
            1
        );
    }

    #[test]
    fn final_stage_stays_put_when_fully_grown() {
        let content = ContentRegistry::bundled().unwrap();
        let mut state = state();
        let id = state.world.spawn_plant(&content, 3, Point::default()).unwrap();
        edit(&mut state, id, |p| p.growth = 1000.0);

        run(&mut state, &content, 2);

        let plant = state.world.plant(id).unwrap();
        assert_eq!(plant.plant_id, 3);
        assert!(plant.growth > 1000.0);
    }
}
