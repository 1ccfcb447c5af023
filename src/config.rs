// ppe-report-service/src/config.rs

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub service: ServiceSettings,
    pub output: OutputSettings,
    pub raster: RasterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// Directory PDFs are saved into; created on demand.
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RasterSettings {
    /// Device-pixel capture scale.
    pub scale: u32,
    /// Extra settle wait after layout, in milliseconds. Layout completion is
    /// already a hard signal here, so this defaults to zero.
    pub settle_delay_ms: u64,
    /// Explicit TrueType font path; when unset, common system paths are
    /// probed.
    #[serde(default)]
    pub font_path: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "ppe-report-service")?
            .set_default("service.log_level", "info")?
            .set_default("output.dir", "./reports")?
            .set_default("raster.scale", "2")?
            .set_default("raster.settle_delay_ms", "0")?
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g. PPE_REPORT__OUTPUT__DIR)
            .add_source(Environment::with_prefix("PPE_REPORT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_config_file() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.service.name, "ppe-report-service");
        assert_eq!(settings.raster.scale, 2);
        assert_eq!(settings.raster.settle_delay_ms, 0);
        assert!(settings.raster.font_path.is_none());
    }
}
