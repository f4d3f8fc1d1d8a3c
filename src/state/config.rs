//! Configuration management

use crate::speech::Backend;
use crate::text::OffsetUnit;
use crate::{DictatorError, Result};
use ini::Ini;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Config file name in the home directory
const CONFIG_FILE: &str = ".dictator.cfg";

/// Reader configuration
///
/// Voice, rate, pitch and volume for the speech engine, and how word
/// highlighting measures the engine's offsets.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Where the configuration was read from (~/.dictator.cfg by default)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| DictatorError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default_config()
        };

        Ok(Self { ini, path })
    }

    /// Build configuration from an in-memory document
    pub fn from_ini(ini: Ini) -> Self {
        Self {
            ini,
            path: PathBuf::new(),
        }
    }

    /// Default config file path (~/.dictator.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE)
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("backend", "native")
            .set("voice", "")
            .set("rate", "1.0")
            .set("pitch", "1.0")
            .set("volume", "1.0");

        ini.with_section(Some("highlight"))
            .set("offset_unit", "chars")
            .set("validate", "true");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Speech backend to create
    pub fn backend(&self) -> Result<Backend> {
        self.get_string("speech", "backend", "native").parse()
    }

    /// Voice id or name; None means the engine default
    pub fn voice(&self) -> Option<String> {
        let voice = self.get_string("speech", "voice", "");
        let voice = voice.trim();
        (!voice.is_empty()).then(|| voice.to_string())
    }

    /// Rate multiplier (0.1-10.0, 1.0 is normal)
    pub fn rate(&self) -> f32 {
        self.get_float("speech", "rate", 1.0).clamp(0.1, 10.0)
    }

    /// Pitch multiplier (0.0-2.0, 1.0 is normal)
    pub fn pitch(&self) -> f32 {
        self.get_float("speech", "pitch", 1.0).clamp(0.0, 2.0)
    }

    /// Volume (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.get_float("speech", "volume", 1.0).clamp(0.0, 1.0)
    }

    /// Unit the speech engine reports boundary offsets in
    ///
    /// An unknown value falls back to characters.
    pub fn offset_unit(&self) -> OffsetUnit {
        let value = self.get_string("highlight", "offset_unit", "chars");
        value.parse().unwrap_or_else(|e| {
            warn!("{}, using chars", e);
            OffsetUnit::Chars
        })
    }

    /// Whether to check each new segment table against the spoken text
    pub fn validate_offsets(&self) -> bool {
        self.get_bool("highlight", "validate", true)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_ini(Self::default_config())
    }
}
