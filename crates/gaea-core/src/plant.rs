use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::PlantTemplate;

/// Growth phase of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantActivity {
    /// Accumulating growth and harvestable resource.
    #[default]
    Growing,
    /// Dormant.
    Resting,
}

impl fmt::Display for PlantActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlantActivity::Growing => "growing",
            PlantActivity::Resting => "resting",
        })
    }
}

/// Behavioural component of a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Plant template id of the current growth stage.
    #[serde(rename = "id")]
    pub plant_id: u32,
    /// Object template of the plant's tile.
    pub object_id: u32,
    /// Species name.
    pub species: String,
    /// Stage name.
    pub name: String,
    /// Stage to mature into.
    pub grown_id: Option<u32>,
    /// Resource added to the tile per second.
    pub growth_rate: f32,
    /// Growth added per second.
    pub growth_speed: f32,
    /// Fully-grown threshold.
    pub max_growth: f32,
    /// Carried for content compatibility; nothing reads or changes it.
    pub is_alive: bool,
    /// Current phase.
    pub activity: PlantActivity,
    /// Accumulated growth, never negative.
    pub growth: f32,
}

impl Plant {
    /// A fresh plant at the given growth stage.
    pub fn from_template(template: &PlantTemplate) -> Self {
        Self {
            plant_id: template.id,
            object_id: template.object_id,
            species: template.species.clone(),
            name: template.name.clone(),
            grown_id: template.grown_id,
            growth_rate: template.growth_rate,
            growth_speed: template.growth_speed,
            max_growth: template.max_growth,
            is_alive: true,
            activity: PlantActivity::Growing,
            growth: template.growth.max(0.0),
        }
    }

    /// Growth has reached the stage maximum.
    pub fn is_fully_grown(&self) -> bool {
        self.growth >= self.max_growth
    }

    /// Become the `grown` stage, carrying accumulated growth forward.
    ///
    /// Growth is kept and added on top of the new stage's maximum so that
    /// progress made in the previous stage is not lost.
    pub fn mature_into(&mut self, grown: &PlantTemplate) {
        let old_growth = self.growth;
        *self = Self::from_template(grown);
        self.growth = old_growth;
        self.max_growth = grown.max_growth + old_growth;
    }

    /// `Growth: g/G`.
    pub fn growth_text(&self) -> String {
        format!("Growth: {}/{}", self.growth as i32, self.max_growth as i32)
    }

    /// Multi-line status: identity, growth, activity.
    pub fn status_text(&self) -> Vec<String> {
        vec![
            format!("{}, {}", self.name, self.species),
            self.growth_text(),
            self.activity.to_string(),
        ]
    }
}
