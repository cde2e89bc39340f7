//! Behavioural state of creatures: species stats, live stats, and needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::CreatureTemplate;
use crate::entity::EntityId;

/// What a creature is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Doing nothing in particular.
    #[default]
    Idle,
    /// Waiting for or walking to a food source.
    LookingAround,
    /// Consuming the resource of its target tile.
    Eating,
    /// Walking to a random nearby destination.
    Wandering,
    /// Reserved; nothing transitions into it yet.
    Sleeping,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Activity::Idle => "idle",
            Activity::LookingAround => "looking around",
            Activity::Eating => "eating",
            Activity::Wandering => "wandering",
            Activity::Sleeping => "sleeping",
        })
    }
}

/// Kind of drive behind a need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Want {
    /// Hunger.
    Food,
    /// Tiredness.
    Sleep,
}

impl fmt::Display for Want {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Want::Food => "food",
            Want::Sleep => "sleep",
        })
    }
}

/// An unmet drive and how long it has been active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Need {
    /// Seconds since onset.
    pub duration: f32,
    /// What is wanted.
    pub want: Want,
}

/// Ordered list of active needs; at most one per [`Want`].
///
/// The first entry is the most pressing one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Needs(Vec<Need>);

impl Needs {
    /// Whether a need for `want` is active.
    pub fn has(&self, want: Want) -> bool {
        self.0.iter().any(|n| n.want == want)
    }

    /// Add a need with zero duration. Returns `false` if one was already active.
    pub fn add(&mut self, want: Want) -> bool {
        if self.has(want) {
            return false;
        }
        self.0.push(Need {
            duration: 0.0,
            want,
        });
        true
    }

    /// Remove the need for `want`. Returns `false` if there was none.
    pub fn remove(&mut self, want: Want) -> bool {
        let before = self.0.len();
        self.0.retain(|n| n.want != want);
        self.0.len() != before
    }

    /// The most pressing need.
    pub fn head(&self) -> Option<&Need> {
        self.0.first()
    }

    /// Add `dt` seconds to every active need.
    pub fn age(&mut self, dt: f32) {
        for need in &mut self.0 {
            need.duration += dt;
        }
    }

    /// Iterate over the active needs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Need> {
        self.0.iter()
    }

    /// Number of active needs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no need is active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Needs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|n| format!("{} ({}s)", n.want, n.duration as u64))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Stats shared by every member of a species. Never changed by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    /// Species id in the content registry.
    #[serde(rename = "id")]
    pub species_id: u32,
    /// Object template of the creature's tile.
    pub object_id: u32,
    /// Species name.
    pub species: String,
    /// Drain and bite size per second.
    pub eating_speed: f32,
    /// Edible resource ids.
    pub eats: Vec<u32>,
    /// Hunger threshold.
    pub min_food: f32,
    /// Satiation threshold.
    pub max_food: f32,
    /// Tiredness threshold.
    pub min_sleep: f32,
    /// Full-rest threshold.
    pub max_sleep: f32,
    /// World units per second.
    pub movement_speed: f32,
}

/// Behavioural component of a creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Species stats.
    #[serde(flatten)]
    pub stats: SpeciesStats,
    /// Individual name.
    pub name: String,
    /// Current activity.
    pub activity: Activity,
    /// Current food, never negative.
    pub food: f32,
    /// Current sleep.
    pub sleep: f32,
    /// Carried for content compatibility; nothing reads or changes it.
    pub is_alive: bool,
    /// Active needs.
    pub needs: Needs,
    /// Tile the creature is walking to.
    pub movement_target: Option<EntityId>,
    /// Tile the creature is acting on.
    pub target: Option<EntityId>,
    /// Id of the latest spatial query this creature issued.
    pub last_event_id: u64,
}

impl Creature {
    /// A fresh creature of the given species.
    pub fn from_template(template: &CreatureTemplate) -> Self {
        Self {
            stats: SpeciesStats {
                species_id: template.id,
                object_id: template.object_id,
                species: template.species.clone(),
                eating_speed: template.eating_speed,
                eats: template.eats.clone(),
                min_food: template.min_food,
                max_food: template.max_food,
                min_sleep: template.min_sleep,
                max_sleep: template.max_sleep,
                movement_speed: template.movement_speed,
            },
            name: template.name.clone(),
            activity: Activity::Idle,
            food: template.food,
            sleep: template.sleep,
            is_alive: true,
            needs: Needs::default(),
            movement_target: None,
            target: None,
            last_event_id: 0,
        }
    }

    /// Food is below the hunger threshold.
    pub fn is_hungry(&self) -> bool {
        self.food < self.stats.min_food
    }

    /// Food has reached the satiation threshold.
    pub fn is_satiated(&self) -> bool {
        self.food >= self.stats.max_food
    }

    /// Sleep is below the tiredness threshold.
    pub fn is_tired(&self) -> bool {
        self.sleep < self.stats.min_sleep
    }

    /// Sleep has reached the full-rest threshold.
    pub fn is_fully_rested(&self) -> bool {
        self.sleep >= self.stats.max_sleep
    }

    /// Whether this creature can eat the given resource kind.
    pub fn eats(&self, resource_id: u32) -> bool {
        self.stats.eats.contains(&resource_id)
    }

    /// Drop the current target and go idle.
    pub fn become_idle(&mut self) {
        self.target = None;
        self.activity = Activity::Idle;
    }

    /// Reserve the next spatial query id.
    pub fn next_event_id(&mut self) -> u64 {
        self.last_event_id += 1;
        self.last_event_id
    }

    /// `Food: f/F, sleep: s/S`.
    pub fn health_text(&self) -> String {
        format!(
            "Food: {}/{}, sleep: {}/{}",
            self.food as i32, self.stats.max_food as i32, self.sleep as i32, self.stats.max_sleep as i32,
        )
    }

    /// Multi-line status: identity, needs, health, activity.
    pub fn status_text(&self) -> Vec<String> {
        vec![
            format!("{}, {}", self.name, self.stats.species),
            format!("Needs {}", self.needs),
            self.health_text(),
            self.activity.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rabbit() -> CreatureTemplate {
        CreatureTemplate {
            id: 1,
            object_id: 10,
            species: "rabbit".into(),
            name: "Rabbit".into(),
            eating_speed: 0.5,
            eats: vec![1, 2],
            min_food: 10.0,
            max_food: 30.0,
            min_sleep: 10.0,
            max_sleep: 30.0,
            movement_speed: 16.0,
            food: 25.0,
            sleep: 30.0,
        }
    }

    #[test]
    fn from_template_copies_stats() {
        let creature = Creature::from_template(&rabbit());
        assert_eq!(creature.stats.species_id, 1);
        assert_eq!(creature.stats.eats, vec![1, 2]);
        assert_eq!(creature.food, 25.0);
        assert_eq!(creature.activity, Activity::Idle);
        assert!(creature.is_alive);
        assert!(creature.needs.is_empty());
    }

    #[test]
    fn needs_are_unique_per_want() {
        let mut needs = Needs::default();
        assert!(needs.add(Want::Food));
        assert!(!needs.add(Want::Food));
        assert!(needs.add(Want::Sleep));
        assert_eq!(needs.len(), 2);
        assert_eq!(needs.head().map(|n| n.want), Some(Want::Food));
        assert!(needs.remove(Want::Food));
        assert!(!needs.remove(Want::Food));
        assert_eq!(needs.head().map(|n| n.want), Some(Want::Sleep));
    }

    #[test]
    fn needs_age() {
        let mut needs = Needs::default();
        needs.add(Want::Food);
        needs.age(1.0);
        needs.age(1.0);
        assert_eq!(needs.head().map(|n| n.duration), Some(2.0));
        assert_eq!(needs.to_string(), "food (2s)");
    }

    #[test]
    fn thresholds() {
        let mut creature = Creature::from_template(&rabbit());
        assert!(!creature.is_hungry());
        creature.food = 9.9;
        assert!(creature.is_hungry());
        creature.food = 30.0;
        assert!(creature.is_satiated());
        assert_eq!(creature.health_text(), "Food: 30/30, sleep: 30/30");
        assert!(creature.is_fully_rested());
        creature.sleep = 5.0;
        assert!(creature.is_tired());
        assert!(creature.eats(2));
        assert!(!creature.eats(3));
    }

    #[test]
    fn event_ids_increase() {
        let mut creature = Creature::from_template(&rabbit());
        assert_eq!(creature.next_event_id(), 1);
        assert_eq!(creature.next_event_id(), 2);
        assert_eq!(creature.last_event_id, 2);
    }
}
