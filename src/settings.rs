//! # Settings Module
//!
//! ## Purpose
//! Persists the formula finder configuration (maximum hits, search options, element mass
//! mode and the candidate elements with their tolerances) as a JSON file.
//!
//! ## Key Features
//! - **Defaults on missing file**: a settings file that does not exist yields the defaults
//! - **Error positions**: malformed JSON is reported with its line and column
//! - **Clamping**: values are applied through the finder setters, so out of range values
//!   are clamped exactly as in the live API
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use chemfinder::settings::FinderSettings;
//! use chemfinder::FormulaFinder::finder::FormulaFinder;
//!
//! let settings = FinderSettings::from_json_file("formula_finder.json")?;
//! let finder = FormulaFinder::from_settings(&settings);
//! finder.settings().save_to_json_file("formula_finder.json")?;
//! ```
use crate::Chemistry::element_table::ElementMassMode;
use crate::FormulaFinder::candidate::CandidateTolerance;
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::finder::FormulaFinder;
use crate::FormulaFinder::options::SearchOptions;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Serializable snapshot of a finder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    pub maximum_hits: usize,
    pub search_options: SearchOptions,
    pub mass_mode: ElementMassMode,
    pub candidates: BTreeMap<String, CandidateTolerance>,
}

impl Default for FinderSettings {
    fn default() -> Self {
        FormulaFinder::new().settings()
    }
}

impl FinderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a JSON file.
    ///
    /// # Returns
    /// * `Ok(FinderSettings)` - parsed settings, or the defaults if the file does not exist
    /// * `Err(FinderError)` - if the file cannot be read or is not valid settings JSON
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FinderError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content).inspect_err(|e| {
            error!("failed to parse settings file {}: {}", path.display(), e);
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, FinderError> {
        serde_json::from_str(content).map_err(|e| {
            if e.is_syntax() || e.is_data() {
                error!("JSON error at line {}, column {}", e.line(), e.column());
            }
            FinderError::Json(e)
        })
    }

    pub fn to_json_string(&self) -> Result<String, FinderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// writes the settings as pretty JSON, replacing the file
    pub fn save_to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FinderError> {
        let content = self.to_json_string()?;
        fs::write(path.as_ref(), content)?;
        info!("settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

impl FormulaFinder {
    /// finder configured from `settings`, values are clamped by the finder setters
    pub fn from_settings(settings: &FinderSettings) -> Self {
        let mut finder = FormulaFinder::with_mass_mode(settings.mass_mode);
        finder.apply_settings(settings);
        finder
    }

    pub fn apply_settings(&mut self, settings: &FinderSettings) {
        if settings.mass_mode != self.mass_mode() {
            self.set_mass_mode(settings.mass_mode);
        }
        self.set_maximum_hits(settings.maximum_hits);
        self.set_search_options(settings.search_options.clone());
        self.set_candidate_elements(settings.candidates.clone());
    }

    pub fn settings(&self) -> FinderSettings {
        FinderSettings {
            maximum_hits: self.maximum_hits(),
            search_options: self.search_options().clone(),
            mass_mode: self.mass_mode(),
            candidates: self.candidate_elements().clone(),
        }
    }
}
