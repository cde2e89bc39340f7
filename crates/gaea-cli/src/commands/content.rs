use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(content: Option<&Path>) -> Result<(), String> {
    let source = content
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled".to_string());
    let content = super::load_content(content)?;

    println!("  {} {}", "Content".bold(), format!("({source})").dimmed());
    println!();

    println!("  {}", "Objects".bold().underline());
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Type", "Resource", "Amount"]);
    for object in content.objects() {
        let resource = object
            .resource_id
            .and_then(|id| content.resource(id).ok())
            .map(|r| r.kind.clone())
            .unwrap_or_else(|| "--".to_string());
        table.add_row(vec![
            object.id.to_string(),
            object.name.clone(),
            object.kind.clone(),
            resource,
            format!("{}", object.amount),
        ]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Creatures".bold().underline());
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Species", "Eats", "Food", "Speed"]);
    for creature in content.creatures() {
        let eats: Vec<String> = creature
            .eats
            .iter()
            .map(|id| {
                content
                    .resource(*id)
                    .map(|r| r.kind.clone())
                    .unwrap_or_else(|_| format!("#{id}"))
            })
            .collect();
        table.add_row(vec![
            creature.id.to_string(),
            format!("{}, {}", creature.name, creature.species),
            eats.join(", "),
            format!("{}..{}", creature.min_food, creature.max_food),
            format!("{}", creature.movement_speed),
        ]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Plants".bold().underline());
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Plant", "Max growth", "Grows into"]);
    for plant in content.plants() {
        let grows_into = plant
            .grown_id
            .and_then(|id| content.plant(id).ok())
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "--".to_string());
        table.add_row(vec![
            plant.id.to_string(),
            format!("{}, {}", plant.name, plant.species),
            format!("{}", plant.max_growth),
            grows_into,
        ]);
    }
    println!("{table}");

    Ok(())
}
