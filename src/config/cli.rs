use crate::config::scenario_config::ScenarioConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "venue-map")]
#[command(about = "Replays venue search results onto a map and tracks the selected venue")]
pub struct CliConfig {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub scenario: String,

    /// Override the zoom level used when recentering
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Clear the selected venue when a tap misses every marker
    #[arg(long)]
    pub reset_on_map_tap: bool,

    /// Keep the selected venue when the search results refresh
    #[arg(long)]
    pub keep_selection_on_resync: bool,

    /// Print the final map state as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔中的值
    pub fn apply_overrides(&self, config: &mut ScenarioConfig) {
        if let Some(zoom) = self.zoom {
            config.map.get_or_insert_with(Default::default).zoom_level = Some(zoom);
            tracing::info!("🔧 Zoom level overridden to: {}", zoom);
        }
        if self.reset_on_map_tap {
            config
                .selection
                .get_or_insert_with(Default::default)
                .reset_on_map_tap = Some(true);
            tracing::info!("🔧 Selection is cleared on map taps");
        }
        if self.keep_selection_on_resync {
            config
                .selection
                .get_or_insert_with(Default::default)
                .reset_on_resync = Some(false);
            tracing::info!("🔧 Selection survives result refreshes");
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("scenario", &self.scenario)?;
        if let Some(zoom) = self.zoom {
            validate_range("zoom", zoom, 1, 21)?;
        }
        Ok(())
    }
}
