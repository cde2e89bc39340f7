use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use gaea_core::creature::Activity;
use gaea_simulation::{SimEventKind, Simulation};

pub fn run(
    save_path: &Path,
    content: Option<&Path>,
    config: Option<&Path>,
    ticks: u64,
    output: Option<&Path>,
    show_events: bool,
) -> Result<(), String> {
    let content = super::load_content(content)?;
    let config = super::load_config(config)?;
    let save = super::load_save(save_path)?;

    let mut sim = Simulation::from_save(&save, content, config)
        .map_err(|e| format!("cannot start simulation: {e}"))?;
    let start = sim.time();
    tracing::info!(ticks, save = %save_path.display(), "running headless");
    sim.run(ticks)
        .map_err(|e| format!("simulation error: {e}"))?;

    // Header
    println!(
        "  {} {} {}",
        "Simulation".bold(),
        save_path.display(),
        format!("({ticks} ticks, seed={})", sim.config().seed).dimmed()
    );
    println!(
        "  {} creatures, {} plants, {} tiles, {} events logged",
        sim.world().creature_count(),
        sim.world().plant_count(),
        sim.world().tile_count(),
        sim.events().len()
    );
    println!(
        "  {} -> {}",
        start.to_string().replace('\n', " "),
        sim.time().to_string().replace('\n', " ")
    );
    println!();

    // Events
    if show_events {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[t {:>5}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let eaten = sim
            .events()
            .count(|k| matches!(k, SimEventKind::TileRemoved { by: Some(_), .. }));
        let matured = sim
            .events()
            .count(|k| matches!(k, SimEventKind::PlantMatured { .. }));
        println!(
            "  {} queries issued, {} food sources exhausted, {} plants matured",
            sim.queries_issued(),
            eaten,
            matured
        );
        println!();
    }

    // Creature table
    if sim.world().creature_count() > 0 {
        println!("  {}", "Creatures".bold().underline());
        println!();

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Creature", "Food", "Needs", "Activity", "Position"]);

        for (id, creature) in sim.world().creatures() {
            let position = sim
                .world()
                .tile(id)
                .map(|t| t.position_text())
                .unwrap_or_else(|| "--".to_string());
            let needs = if creature.needs.is_empty() {
                "--".to_string()
            } else {
                creature.needs.to_string()
            };
            table.add_row(vec![
                id.to_string(),
                format!("{}, {}", creature.name, creature.stats.species),
                format_food(creature.food, creature.stats.min_food, creature.stats.max_food),
                needs,
                colorize_activity(creature.activity),
                position,
            ]);
        }

        println!("{table}");
        println!();
    }

    // Plant table
    if sim.world().plant_count() > 0 {
        println!("  {}", "Plants".bold().underline());
        println!();

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Plant", "Growth", "Resource", "Position"]);

        for (id, plant) in sim.world().plants() {
            let tile = sim.world().tile(id);
            table.add_row(vec![
                id.to_string(),
                format!("{}, {}", plant.name, plant.species),
                plant.growth_text(),
                tile.map(|t| format!("{:.1}", t.amount()))
                    .unwrap_or_else(|| "--".to_string()),
                tile.map(|t| t.position_text())
                    .unwrap_or_else(|| "--".to_string()),
            ]);
        }

        println!("{table}");
        println!();
    }

    if let Some(output) = output {
        sim.save()
            .write_to(output)
            .map_err(|e| format!("cannot write {}: {e}", output.display()))?;
        println!("  Saved to {}", output.display());
    }

    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::NeedAdded { .. } => description.yellow(),
        SimEventKind::NeedSatisfied { .. } => description.green(),
        SimEventKind::ActivityChanged { .. } => description.cyan(),
        SimEventKind::QueryIssued { .. } | SimEventKind::StaleResponse { .. } => {
            description.dimmed()
        }
        SimEventKind::TargetAcquired { .. } | SimEventKind::Arrived { .. } => description.blue(),
        SimEventKind::TileRemoved { .. } => description.red(),
        SimEventKind::Spawned { .. }
        | SimEventKind::TileReplaced { .. }
        | SimEventKind::PlantMatured { .. } => description.green().bold(),
        SimEventKind::Sunrise
        | SimEventKind::Sunset
        | SimEventKind::Paused
        | SimEventKind::Resumed => description.magenta(),
    }
}

fn colorize_activity(activity: Activity) -> String {
    let label = activity.to_string();
    match activity {
        Activity::Idle => label.normal(),
        Activity::LookingAround => label.yellow(),
        Activity::Eating => label.green(),
        Activity::Wandering => label.blue(),
        Activity::Sleeping => label.dimmed(),
    }
    .to_string()
}

fn format_food(food: f32, min: f32, max: f32) -> String {
    let text = format!("{food:.1}/{max:.0}");
    if food < min {
        text.red().to_string()
    } else if food >= max {
        text.green().to_string()
    } else {
        text
    }
}
