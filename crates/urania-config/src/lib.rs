use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use urania::{CalcFlags, ChartOptions, EphemerisError, HouseSystem, SwissEphemerisAdapter};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "URANIA_CONFIG";

/// Which ephemeris source charts are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EphemerisMode {
    /// Built-in analytic ephemeris, no data files needed
    #[default]
    Moshier,
    /// Swiss Ephemeris data files from the configured path
    Swiss,
}

impl EphemerisMode {
    pub fn flags(self) -> CalcFlags {
        match self {
            EphemerisMode::Moshier => CalcFlags::MOSEPH | CalcFlags::SPEED,
            EphemerisMode::Swiss => CalcFlags::SWIEPH | CalcFlags::SPEED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub ephemeris_path: Option<PathBuf>,
    pub mode: EphemerisMode,
    pub house_system: HouseSystem,
    pub initial_capacity: usize,
    pub max_output_bytes: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ChartOptions::default();
        Self {
            ephemeris_path: None,
            mode: EphemerisMode::default(),
            house_system: HouseSystem::default(),
            initial_capacity: options.initial_capacity,
            max_output_bytes: options.max_output_bytes,
        }
    }
}

impl Settings {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            flags: self.mode.flags(),
            initial_capacity: self.initial_capacity,
            max_output_bytes: self.max_output_bytes,
        }
    }

    pub fn adapter(&self) -> anyhow::Result<SwissEphemerisAdapter> {
        if self.mode == EphemerisMode::Swiss && self.ephemeris_path.is_none() {
            log::warn!("ephemeris.mode is \"swiss\" but no ephemeris.path is set; relying on SWISS_EPHEMERIS_PATH");
        }
        SwissEphemerisAdapter::new(self.ephemeris_path.clone())
            .context("Failed to set up Swiss Ephemeris")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    mode: EphemerisMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartToml {
    #[serde(default)]
    house_system: Option<String>,
    #[serde(default = "default_initial_capacity")]
    initial_capacity: usize,
    #[serde(default)]
    max_output_bytes: Option<usize>,
}

fn default_initial_capacity() -> usize {
    ChartOptions::default().initial_capacity
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    chart: Option<ChartToml>,
}

pub fn parse_house_system(name: &str) -> anyhow::Result<HouseSystem> {
    HouseSystem::parse(name).ok_or_else(|| {
        EphemerisError::UnknownHouseSystem {
            name: name.to_string(),
            valid: HouseSystem::catalogue_names(),
        }
        .into()
    })
}

/// Parse config text. Missing sections and fields take their defaults.
pub fn parse_settings(text: &str) -> anyhow::Result<Settings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania config: {e}"))?;

    let mut settings = Settings {
        ephemeris_path: root.ephemeris.path,
        mode: root.ephemeris.mode,
        ..Settings::default()
    };
    if let Some(chart) = root.chart {
        if let Some(name) = chart.house_system.as_deref() {
            settings.house_system = parse_house_system(name)
                .with_context(|| format!("Invalid chart.house_system {name:?}"))?;
        }
        settings.initial_capacity = chart.initial_capacity;
        settings.max_output_bytes = chart.max_output_bytes;
    }
    Ok(settings)
}

/// Locate and read the config file.
///
/// An explicit path or `URANIA_CONFIG` must exist; otherwise the common
/// relative locations are tried and `None` means run on defaults.
pub fn read_config_text(explicit: Option<&Path>) -> anyhow::Result<Option<(PathBuf, String)>> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = named {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        return Ok(Some((path, text)));
    }

    let paths = ["configs/urania.toml", "../../configs/urania.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), c)));
        }
    }
    Ok(None)
}

pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    match read_config_text(explicit)? {
        Some((path, text)) => {
            log::debug!("Loading config from {}", path.display());
            parse_settings(&text).with_context(|| format!("In {}", path.display()))
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Settings::default())
        }
    }
}
