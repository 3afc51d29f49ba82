//! Data validation utilities.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sw_core::data::{RulesData, ScenarioData};
use sw_core::rules::Rules;
use sw_core::simulation::Simulation;

use crate::error::{read_file, ToolError, ToolResult};

/// Name of the rules file inside a data directory.
pub const RULES_FILE: &str = "rules.ron";

/// What a successful validation covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Superweapon types defined.
    pub superweapons: usize,
    /// Structure types defined.
    pub structures: usize,
    /// Powered unit types defined.
    pub units: usize,
    /// Scenario files checked against the rules, in name order.
    pub scenarios: Vec<String>,
}

/// Load, validate and register a rules file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_rules(path: &Path) -> ToolResult<Rules> {
    let data = load_rules_data(path)?;
    Ok(Rules::from_data(&data)?)
}

fn load_rules_data(path: &Path) -> ToolResult<RulesData> {
    let contents = read_file(path)?;
    Ok(RulesData::from_ron(&path.display().to_string(), &contents)?)
}

/// Load a scenario file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_scenario(path: &Path) -> ToolResult<ScenarioData> {
    let contents = read_file(path)?;
    Ok(ScenarioData::from_ron(&path.display().to_string(), &contents)?)
}

/// Validate the rules and every scenario in a data directory.
///
/// The directory must contain [`RULES_FILE`]; every other `.ron` file is
/// treated as a scenario and must build a simulation under those rules.
///
/// # Errors
///
/// Returns the first error encountered.
pub fn validate_data_directory(path: &Path) -> ToolResult<ValidationSummary> {
    let data = load_rules_data(&path.join(RULES_FILE))?;
    let rules = Rules::from_data(&data)?;
    tracing::info!(
        superweapons = data.superweapons.len(),
        structures = data.structures.len(),
        units = data.units.len(),
        "Rules valid"
    );

    let mut scenarios = Vec::new();
    for scenario_path in scenario_files(path)? {
        let scenario = load_scenario(&scenario_path)?;
        Simulation::from_scenario(rules.clone(), &scenario)?;

        let name = scenario_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!(scenario = %name, factions = scenario.factions.len(), "Scenario valid");
        scenarios.push(name);
    }

    Ok(ValidationSummary {
        superweapons: data.superweapons.len(),
        structures: data.structures.len(),
        units: data.units.len(),
        scenarios,
    })
}

fn scenario_files(dir: &Path) -> ToolResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ToolError::IoError {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "ron"))
        .filter(|p| p.file_name().is_some_and(|name| name != RULES_FILE))
        .collect();
    files.sort();
    Ok(files)
}
