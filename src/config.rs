//! Board configuration.
//!
//! Stored as JSON; every field is optional and falls back to the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::error::{BoardError, Result};
use crate::reorder::SortedDragPolicy;
use crate::view::{FilterCriteria, SearchField};

/// Snap geometry and thresholds of the backlog bottom sheet.
///
/// Offsets are measured from the top of the viewport, so a larger offset
/// means a more closed panel. All fractions are of the viewport height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Released beyond this after a drag: snap collapsed, else half-open
    pub drag_release_threshold: f64,
    /// Clicked while beyond this: open to half, else collapse
    pub click_toggle_threshold: f64,
    pub half_open_fraction: f64,
    pub collapsed_fraction: f64,
    /// Smallest offset a drag may reach
    pub expanded_fraction: f64,
    /// Clicks this soon after a drag release are ignored
    pub click_cooldown_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            drag_release_threshold: 0.8,
            click_toggle_threshold: 0.6,
            half_open_fraction: 0.5,
            collapsed_fraction: 0.9,
            expanded_fraction: 0.0,
            click_cooldown_ms: 100,
        }
    }
}

impl PanelConfig {
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("drag_release_threshold", self.drag_release_threshold),
            ("click_toggle_threshold", self.click_toggle_threshold),
            ("half_open_fraction", self.half_open_fraction),
            ("collapsed_fraction", self.collapsed_fraction),
            ("expanded_fraction", self.expanded_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(BoardError::ConfigError(format!(
                    "panel.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.expanded_fraction > self.collapsed_fraction {
            return Err(BoardError::ConfigError(
                "panel.expanded_fraction must not exceed panel.collapsed_fraction".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub panel: PanelConfig,
    /// Status keys that count as closed for the active/closed groups
    pub closed_statuses: Vec<String>,
    pub search_fields: Vec<SearchField>,
    pub page_size: usize,
    pub sorted_drag: SortedDragPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            closed_statuses: ["done", "resolved", "closed", "wont_fix"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_fields: vec![SearchField::Title, SearchField::Description, SearchField::Id],
            page_size: 25,
            sorted_drag: SortedDragPolicy::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).await?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded board config");
        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.panel.validate()?;
        if self.page_size == 0 {
            return Err(BoardError::ConfigError(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn filter_criteria(&self) -> FilterCriteria<'_> {
        FilterCriteria::new(&self.closed_statuses, &self.search_fields)
    }
}
