use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(save_path: &Path, all: bool) -> Result<(), String> {
    let save = super::load_save(save_path)?;

    println!(
        "  {} {} {}",
        "Save".bold(),
        save_path.display(),
        format!("(format v{})", save.version).dimmed()
    );
    if let Some(saved_at) = save.saved_at {
        println!("  Saved at {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(time) = save.time {
        println!("  {}", time.to_string().replace('\n', " "));
    }
    println!(
        "  {} objects: {} tiles, {} creatures, {} plants",
        save.entity_count(),
        save.tiles.len(),
        save.creatures.len(),
        save.plants.len()
    );
    println!();

    if !save.creatures.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Creature", "Health", "Activity", "Position"]);
        for saved in &save.creatures {
            let creature = &saved.creature;
            table.add_row(vec![
                id_text(saved.tile.entity_id),
                format!("{}, {}", creature.name, creature.stats.species),
                creature.health_text(),
                creature.activity.to_string(),
                position_text(saved.tile.position.x, saved.tile.position.y),
            ]);
        }
        println!("{table}");
        println!();
    }

    if !save.plants.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Plant", "Growth", "Activity", "Position"]);
        for saved in &save.plants {
            let plant = &saved.plant;
            table.add_row(vec![
                id_text(saved.tile.entity_id),
                format!("{}, {}", plant.name, plant.species),
                plant.growth_text(),
                plant.activity.to_string(),
                position_text(saved.tile.position.x, saved.tile.position.y),
            ]);
        }
        println!("{table}");
        println!();
    }

    if all && !save.tiles.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Object", "Layer", "Resource", "Position"]);
        for tile in &save.tiles {
            let resource = tile
                .accessible_resource
                .map(|r| format!("#{} x {:.1}", r.resource_id, r.amount))
                .unwrap_or_else(|| "--".to_string());
            table.add_row(vec![
                id_text(tile.entity_id),
                tile.object_id.to_string(),
                tile.layer.to_string(),
                resource,
                position_text(tile.position.x, tile.position.y),
            ]);
        }
        println!("{table}");
        println!();
    }

    Ok(())
}

fn id_text(id: Option<gaea_core::EntityId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "--".to_string())
}

fn position_text(x: f32, y: f32) -> String {
    format!("({}, {})", x as i32, y as i32)
}
