//! Per-calendar filter configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FilterCalError, FilterCalResult};
use crate::merge::SummaryPolicy;

const DEFAULT_SEPARATOR: &str = " / ";

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_match_fields() -> Vec<MatchField> {
    vec![MatchField::Summary]
}

fn default_true() -> bool {
    true
}

/// One filtered calendar: which upstream calendar to track and which of its
/// events to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: String,

    pub tracking_calendar_id: String,

    /// Keyword (or pattern when `regex` is set) tested against event text
    #[serde(default)]
    pub filter: String,

    #[serde(default)]
    pub regex: bool,

    /// Categories that are kept regardless of the keyword
    #[serde(default)]
    pub include_work_types: Vec<String>,

    /// Categories that are always dropped, even when included or matching
    #[serde(default)]
    pub exclude_types: Vec<String>,

    #[serde(default = "default_match_fields")]
    pub match_fields: Vec<MatchField>,

    #[serde(default)]
    pub merge: MergeConfig,
}

impl FilterConfig {
    pub fn new(name: &str, tracking_calendar_id: &str) -> Self {
        FilterConfig {
            name: name.to_string(),
            tracking_calendar_id: tracking_calendar_id.to_string(),
            filter: String::new(),
            regex: false,
            include_work_types: Vec::new(),
            exclude_types: Vec::new(),
            match_fields: default_match_fields(),
            merge: MergeConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> FilterCalResult<Self> {
        let config: FilterConfig =
            toml::from_str(content).map_err(|e| FilterCalError::Config(e.to_string()))?;
        config.check_fields()?;
        Ok(config)
    }

    /// Structural checks that don't depend on compiling the filter.
    pub(crate) fn check_fields(&self) -> FilterCalResult<()> {
        if self.name.trim().is_empty() {
            return Err(FilterCalError::Config("Calendar name must not be empty".into()));
        }
        if self.tracking_calendar_id.trim().is_empty() {
            return Err(FilterCalError::Config(format!(
                "Calendar '{}' has an empty tracking_calendar_id",
                self.name
            )));
        }
        if self.match_fields.is_empty() {
            return Err(FilterCalError::Config(format!(
                "Calendar '{}' must list at least one entry in match_fields",
                self.name
            )));
        }
        self.merge.summary_policy()?;
        Ok(())
    }
}

/// Event text fields the keyword is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Summary,
    Description,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Join,
    First,
    Label,
}

/// How selected events are combined into spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// When false, every selected event is published as its own span
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub summary: SummaryMode,

    #[serde(default = "default_separator")]
    pub separator: String,

    /// Fixed summary used with `summary = "label"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            enabled: true,
            summary: SummaryMode::Join,
            separator: default_separator(),
            label: None,
        }
    }
}

impl MergeConfig {
    pub fn summary_policy(&self) -> FilterCalResult<SummaryPolicy> {
        match self.summary {
            SummaryMode::Join => Ok(SummaryPolicy::Join(self.separator.clone())),
            SummaryMode::First => Ok(SummaryPolicy::First),
            SummaryMode::Label => match &self.label {
                Some(label) => Ok(SummaryPolicy::Label(label.clone())),
                None => Err(FilterCalError::Config(
                    "merge.summary = \"label\" requires merge.label to be set".into(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = FilterConfig::from_toml_str(
            r#"
name = "Work"
tracking_calendar_id = "roster"
"#,
        )
        .unwrap();

        assert_eq!(config.filter, "");
        assert!(!config.regex);
        assert_eq!(config.match_fields, vec![MatchField::Summary]);
        assert!(config.merge.enabled);
        assert_eq!(
            config.merge.summary_policy().unwrap(),
            SummaryPolicy::Join(" / ".to_string())
        );
    }

    #[test]
    fn test_full_config() {
        let config = FilterConfig::from_toml_str(
            r#"
name = "Shifts"
tracking_calendar_id = "roster"
filter = "^(Early|Late)"
regex = true
include_work_types = ["Lunch"]
exclude_types = ["Public Holiday"]
match_fields = ["summary", "location"]

[merge]
summary = "label"
label = "Working"
"#,
        )
        .unwrap();

        assert!(config.regex);
        assert_eq!(config.exclude_types, vec!["Public Holiday"]);
        assert_eq!(
            config.merge.summary_policy().unwrap(),
            SummaryPolicy::Label("Working".to_string())
        );
    }

    #[test]
    fn test_label_mode_without_label_is_rejected() {
        let result = FilterConfig::from_toml_str(
            r#"
name = "Shifts"
tracking_calendar_id = "roster"

[merge]
summary = "label"
"#,
        );

        assert!(matches!(result, Err(FilterCalError::Config(_))));
    }

    #[test]
    fn test_missing_tracking_calendar_is_rejected() {
        let result = FilterConfig::from_toml_str(r#"name = "Shifts""#);

        assert!(matches!(result, Err(FilterCalError::Config(_))));
    }
}
