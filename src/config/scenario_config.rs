use crate::core::synchronizer::DEFAULT_ZOOM_LEVEL;
use crate::domain::model::{GeoPoint, ResultGroup, ResultSet};
use crate::domain::ports::MapSettings;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{
    validate_coordinates, validate_non_empty_string, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: Option<ScenarioInfo>,
    pub map: Option<MapSection>,
    pub selection: Option<SelectionSection>,
    pub location: Option<LocationSection>,
    pub replay: Option<ReplaySection>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// 相對路徑（results_file）以此目錄為基準
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSection {
    pub zoom_level: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSection {
    pub reset_on_map_tap: Option<bool>,
    pub reset_on_resync: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSection {
    pub initial_fix: Option<GeoPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaySection {
    pub step_delay_ms: Option<u64>,
}

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Activate,
    Deactivate,
    Publish {
        groups: Option<Vec<ResultGroup>>,
        results_file: Option<String>,
    },
    ClearResults,
    Fix {
        lat: f64,
        lon: f64,
    },
    LoseFix,
    TapItem {
        overlay: usize,
        item: usize,
    },
    TapMap,
    OpenDetail,
}

impl Step {
    pub fn describe(&self) -> String {
        match self {
            Step::Activate => "activate view".to_string(),
            Step::Deactivate => "deactivate view".to_string(),
            Step::Publish {
                results_file: Some(file),
                ..
            } => format!("publish results from {}", file),
            Step::Publish { groups, .. } => format!(
                "publish {} result groups",
                groups.as_ref().map(|g| g.len()).unwrap_or(0)
            ),
            Step::ClearResults => "clear search results".to_string(),
            Step::Fix { lat, lon } => format!("location fix at {}, {}", lat, lon),
            Step::LoseFix => "lose location fix".to_string(),
            Step::TapItem { overlay, item } => format!("tap overlay {} item {}", overlay, item),
            Step::TapMap => "tap empty map".to_string(),
            Step::OpenDetail => "press venue button".to_string(),
        }
    }
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${RESULTS_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(info) = &self.scenario {
            validate_non_empty_string("scenario.name", &info.name)?;
        }

        validate_range("map.zoom_level", self.zoom_level(), 1, 21)?;

        if let Some(fix) = self.initial_fix() {
            validate_coordinates("location.initial_fix", fix.lat, fix.lon)?;
        }

        if self.steps.is_empty() {
            return Err(MapError::InvalidConfigValueError {
                field: "steps".to_string(),
                value: "[]".to_string(),
                reason: "A scenario needs at least one step".to_string(),
            });
        }

        for (index, step) in self.steps.iter().enumerate() {
            let field = format!("steps[{}]", index);
            match step {
                Step::Publish {
                    groups: None,
                    results_file: None,
                } => {
                    return Err(MapError::MissingConfigError {
                        field: format!("{}.groups or {}.results_file", field, field),
                    });
                }
                Step::Publish {
                    groups: Some(_),
                    results_file: Some(file),
                } => {
                    return Err(MapError::InvalidConfigValueError {
                        field: format!("{}.results_file", field),
                        value: file.clone(),
                        reason: "Use either inline groups or a results file, not both"
                            .to_string(),
                    });
                }
                Step::Publish {
                    results_file: Some(file),
                    ..
                } => validate_path(&format!("{}.results_file", field), file)?,
                Step::Fix { lat, lon } => validate_coordinates(&field, *lat, *lon)?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Result set a publish step hands to the search results subject.
    pub fn results_for(&self, step: &Step) -> Result<ResultSet> {
        match step {
            Step::Publish {
                groups: Some(groups),
                ..
            } => Ok(groups.clone()),
            Step::Publish {
                results_file: Some(file),
                ..
            } => {
                let path = self.resolve_path(file);
                tracing::debug!("Reading search results from {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                Ok(serde_json::from_str(&content)?)
            }
            Step::Publish { .. } => Err(MapError::MissingConfigError {
                field: "groups or results_file".to_string(),
            }),
            other => Err(MapError::ConfigError {
                message: format!("Step '{}' does not publish results", other.describe()),
            }),
        }
    }

    fn resolve_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn name(&self) -> &str {
        self.scenario
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("unnamed scenario")
    }

    pub fn zoom_level(&self) -> u8 {
        self.map
            .as_ref()
            .and_then(|m| m.zoom_level)
            .unwrap_or(DEFAULT_ZOOM_LEVEL)
    }

    pub fn reset_on_map_tap(&self) -> bool {
        self.selection
            .as_ref()
            .and_then(|s| s.reset_on_map_tap)
            .unwrap_or(false)
    }

    pub fn reset_on_resync(&self) -> bool {
        self.selection
            .as_ref()
            .and_then(|s| s.reset_on_resync)
            .unwrap_or(true)
    }

    pub fn initial_fix(&self) -> Option<GeoPoint> {
        self.location.as_ref().and_then(|l| l.initial_fix)
    }

    pub fn step_delay_ms(&self) -> u64 {
        self.replay
            .as_ref()
            .and_then(|r| r.step_delay_ms)
            .unwrap_or(0)
    }
}

impl MapSettings for ScenarioConfig {
    fn zoom_level(&self) -> u8 {
        self.zoom_level()
    }

    fn reset_selection_on_map_tap(&self) -> bool {
        self.reset_on_map_tap()
    }

    fn reset_selection_on_resync(&self) -> bool {
        self.reset_on_resync()
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
