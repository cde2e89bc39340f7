pub mod content;
pub mod inspect;
pub mod new;
pub mod simulate;

use std::path::Path;

use gaea_core::ContentRegistry;
use gaea_core::SaveFile;
use gaea_simulation::SimConfig;

/// Load content from `path`, or the bundled set when none is given.
fn load_content(path: Option<&Path>) -> Result<ContentRegistry, String> {
    match path {
        Some(path) => ContentRegistry::from_path(path)
            .map_err(|e| format!("cannot load content from {}: {e}", path.display())),
        None => ContentRegistry::bundled().map_err(|e| format!("bundled content is invalid: {e}")),
    }
}

/// Load a simulation config from `path`, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    SimConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Read a save file.
fn load_save(path: &Path) -> Result<SaveFile, String> {
    SaveFile::read_from(path).map_err(|e| format!("cannot read save {}: {e}", path.display()))
}
