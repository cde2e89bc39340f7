//! Needs-driven creature behaviour.
//!
//! Each tick a creature ages its needs, burns food, notices hunger, asks the
//! query broker for food or a wander destination, walks toward its movement
//! target, and eats. Query answers arrive on a later tick through
//! [`CreatureSystem::handle_response`].

use std::f32::consts::PI;

use gaea_core::creature::{Activity, Creature, Want};
use gaea_core::entity::EntityId;
use gaea_core::tile::Tile;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::context::SimContext;
use crate::debug::DebugColor;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::query::{QueryPurpose, SpatialRequest, SpatialResponse};
use crate::system::System;

/// Runs the activity state machine of every creature.
#[derive(Debug, Default)]
pub struct CreatureSystem {
    queries_issued: u64,
}

impl CreatureSystem {
    /// A new creature system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spatial queries issued by creatures so far.
    pub fn queries_issued(&self) -> u64 {
        self.queries_issued
    }

    /// Deliver the answer to an earlier spatial query.
    ///
    /// Answers for creatures that no longer exist are dropped with a warning.
    /// Answers the creature no longer cares about are ignored.
    pub fn handle_response(&mut self, ctx: &mut SimContext<'_>, response: SpatialResponse) {
        let id = response.origin;
        let Some(mut creature) = ctx.world.take_creature(id) else {
            tracing::warn!(
                origin = %id,
                event_id = response.event_id,
                "dropping spatial response for a missing creature"
            );
            return;
        };
        apply_response(ctx, id, &mut creature, response);
        ctx.world.put_creature(id, creature);
    }

    fn update(&mut self, ctx: &mut SimContext<'_>, id: EntityId, creature: &mut Creature) {
        let dt = ctx.dt();

        creature.needs.age(dt);

        if creature.activity != Activity::Eating {
            creature.food = (creature.food - creature.stats.eating_speed * dt).max(0.0);
        }

        if creature.is_hungry() && creature.needs.add(Want::Food) {
            ctx.emit(
                SimEventKind::NeedAdded {
                    entity: id,
                    want: Want::Food,
                },
                format!("{} {id} needs food", creature.name),
            );
        }

        let wants_food = creature.needs.head().is_some_and(|n| n.want == Want::Food);
        if wants_food
            && !matches!(creature.activity, Activity::LookingAround | Activity::Eating)
        {
            creature.movement_target = None;
            set_activity(ctx, id, creature, Activity::LookingAround);
            let eats = creature.stats.eats.clone();
            self.issue_query(ctx, id, creature, QueryPurpose::Forage, move |tile| {
                tile.offers_any(&eats)
            });
        }

        move_toward_target(ctx, id, creature);
        eat(ctx, id, creature);

        if creature.activity == Activity::Idle
            && creature.needs.is_empty()
            && decide_to_wander(ctx)
        {
            set_activity(ctx, id, creature, Activity::Wandering);
            self.issue_query(ctx, id, creature, QueryPurpose::Wander, |_| true);
        }
    }

    fn issue_query(
        &mut self,
        ctx: &mut SimContext<'_>,
        id: EntityId,
        creature: &mut Creature,
        purpose: QueryPurpose,
        filter: impl Fn(&Tile) -> bool + 'static,
    ) {
        let radius = match purpose {
            QueryPurpose::Forage => ctx.config.forage_radius,
            QueryPurpose::Wander => ctx.config.wander_radius,
        };
        let Some(area) = ctx.world.tile(id).map(|t| t.surrounding_area(radius)) else {
            return;
        };
        let event_id = creature.next_event_id();
        ctx.broker
            .submit(SpatialRequest::new(id, event_id, area, purpose, filter));
        self.queries_issued += 1;
        ctx.emit(
            SimEventKind::QueryIssued {
                entity: id,
                event_id,
                purpose,
            },
            format!("{} {id} looks around ({purpose:?})", creature.name),
        );
    }
}

impl System for CreatureSystem {
    fn name(&self) -> &str {
        "creatures"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for id in ctx.world.creature_ids() {
            let Some(mut creature) = ctx.world.take_creature(id) else {
                continue;
            };
            self.update(ctx, id, &mut creature);
            ctx.world.put_creature(id, creature);
        }
        Ok(())
    }
}

fn set_activity(ctx: &mut SimContext<'_>, id: EntityId, creature: &mut Creature, to: Activity) {
    let from = creature.activity;
    if from == to {
        return;
    }
    creature.activity = to;
    tracing::debug!(%id, %from, %to, "activity changed");
    ctx.emit(
        SimEventKind::ActivityChanged { entity: id, from, to },
        format!("{} {id} is {to}", creature.name),
    );
}

fn become_idle(ctx: &mut SimContext<'_>, id: EntityId, creature: &mut Creature) {
    creature.target = None;
    set_activity(ctx, id, creature, Activity::Idle);
}

fn move_toward_target(ctx: &mut SimContext<'_>, id: EntityId, creature: &mut Creature) {
    let Some(target) = creature.movement_target else {
        return;
    };
    let Some(destination) = ctx.world.tile(target).map(|t| t.position) else {
        tracing::debug!(%id, %target, "movement target vanished");
        creature.movement_target = None;
        become_idle(ctx, id, creature);
        return;
    };

    let epsilon = ctx.config.arrival_epsilon;
    let step = creature.stats.movement_speed * ctx.dt();
    let Some(tile) = ctx.world.tile_mut(id) else {
        return;
    };
    if tile.position.distance(destination) > epsilon {
        tile.position = tile.position.step_toward(destination, step);
        let aabb = tile.aabb();
        ctx.index.update(id, aabb);
        tracing::trace!(%id, x = tile.position.x, y = tile.position.y, "moved");
    }
    if tile.position.distance(destination) > epsilon {
        return;
    }

    creature.movement_target = None;
    ctx.emit(
        SimEventKind::Arrived {
            entity: id,
            at: target,
        },
        format!("{} {id} reached {target}", creature.name),
    );
    match creature.activity {
        Activity::LookingAround => {
            let edible = ctx
                .world
                .tile(target)
                .is_some_and(|t| t.offers_any(&creature.stats.eats));
            if edible {
                creature.target = Some(target);
                set_activity(ctx, id, creature, Activity::Eating);
            } else {
                become_idle(ctx, id, creature);
            }
        }
        Activity::Wandering => become_idle(ctx, id, creature),
        _ => {}
    }
}

fn eat(ctx: &mut SimContext<'_>, id: EntityId, creature: &mut Creature) {
    if creature.activity != Activity::Eating {
        return;
    }
    let Some(target) = creature.target else {
        become_idle(ctx, id, creature);
        return;
    };

    if creature.is_satiated() {
        become_idle(ctx, id, creature);
        if creature.needs.remove(Want::Food) {
            ctx.emit(
                SimEventKind::NeedSatisfied {
                    entity: id,
                    want: Want::Food,
                },
                format!("{} {id} is full", creature.name),
            );
        }
        return;
    }

    let bite_size = creature.stats.eating_speed * ctx.dt();
    let Some(resource) = ctx
        .world
        .tile_mut(target)
        .and_then(|t| t.accessible_resource.as_mut())
    else {
        tracing::debug!(%id, %target, "food source vanished");
        become_idle(ctx, id, creature);
        return;
    };
    let bite = bite_size.min(resource.amount).max(0.0);
    creature.food += bite;
    resource.amount -= bite;
    let exhausted = resource.amount <= 0.0;
    if exhausted {
        resource.amount = 0.0;
    }
    tracing::trace!(%id, %target, bite, food = creature.food, "ate");

    if exhausted {
        ctx.remove_tile(target, Some(id));
        become_idle(ctx, id, creature);
    }
}

fn decide_to_wander(ctx: &mut SimContext<'_>) -> bool {
    let roll = normal_roll(ctx.rng, ctx.config.wander_mean, ctx.config.wander_std_dev);
    roll > ctx.config.wander_threshold
}

/// Normally distributed sample via the Box-Muller transform.
fn normal_roll<R: Rng + ?Sized>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    let u1 = rng.random::<f32>().max(f32::EPSILON);
    let u2 = rng.random::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

fn apply_response(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    creature: &mut Creature,
    response: SpatialResponse,
) {
    let expected = match response.purpose {
        QueryPurpose::Forage => Activity::LookingAround,
        QueryPurpose::Wander => Activity::Wandering,
    };
    if response.event_id != creature.last_event_id
        || creature.activity != expected
        || creature.movement_target.is_some()
    {
        tracing::debug!(
            %id,
            event_id = response.event_id,
            latest = creature.last_event_id,
            activity = %creature.activity,
            "ignoring stale spatial response"
        );
        ctx.emit(
            SimEventKind::StaleResponse {
                entity: id,
                event_id: response.event_id,
            },
            format!("{} {id} ignored an outdated answer", creature.name),
        );
        return;
    }

    let Some(origin) = ctx.world.tile(id).map(|t| t.position) else {
        return;
    };
    let candidates: Vec<EntityId> = response
        .results
        .iter()
        .copied()
        .filter(|r| *r != id && ctx.world.contains(*r))
        .collect();
    let chosen = match response.purpose {
        QueryPurpose::Forage => candidates
            .iter()
            .filter_map(|r| ctx.world.tile(*r).map(|t| (*r, t.position.distance(origin))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(r, _)| r),
        QueryPurpose::Wander => candidates.choose(ctx.rng).copied(),
    };

    let Some(target) = chosen else {
        tracing::debug!(%id, purpose = ?response.purpose, "nothing found");
        become_idle(ctx, id, creature);
        return;
    };

    creature.movement_target = Some(target);
    ctx.emit(
        SimEventKind::TargetAcquired { entity: id, target },
        format!("{} {id} heads for {target}", creature.name),
    );
    if let Some(tile) = ctx.world.tile(id) {
        let area = tile.aabb();
        ctx.publish_debug(area, DebugColor::White);
    }
    if let Some(tile) = ctx.world.tile(target) {
        let area = tile.aabb();
        ctx.publish_debug(area, DebugColor::Blue);
    }
}
