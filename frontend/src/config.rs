//! Tunables for the page enhancements.
//!
//! Every field has a default matching the shipped page. A page can override
//! any subset with an inline block:
//!
//! ```html
//! <script type="application/json" id="kg-config">{"particles": {"count": 30}}</script>
//! ```

use serde::Deserialize;
use web_sys::Document;

use crate::error::EnhanceError;

pub const CONFIG_ELEMENT_ID: &str = "kg-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub particles: ParticleConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub nav: NavConfig,
    pub theme: ThemeConfig,
    pub easter_egg: EasterEggConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            particles: ParticleConfig::default(),
            reveal: RevealConfig::default(),
            counter: CounterConfig::default(),
            nav: NavConfig::default(),
            theme: ThemeConfig::default(),
            easter_egg: EasterEggConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub primary_color: String,
    pub secondary_color: String,
    /// Share of particles drawn in `secondary_color`.
    pub secondary_ratio: f64,
    /// Upper bound of |dx| and |dy| is half of this.
    pub speed: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 55,
            primary_color: "#D4A017".to_string(),
            secondary_color: "#A8D8EA".to_string(),
            secondary_ratio: 0.4,
            speed: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            root_margin: "0px 0px -60px 0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub threshold: f64,
    pub duration_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            duration_ms: 1400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// A section counts as current once scrolled to within this many pixels of its top.
    pub section_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { section_offset: 120.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "kg-tema".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EasterEggConfig {
    pub dwell_ms: u32,
    pub exit_ms: u32,
}

impl Default for EasterEggConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3500,
            exit_ms: 500,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, EnhanceError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the inline config block, if the page has one.
    pub fn from_document(document: &Document) -> Result<Self, EnhanceError> {
        match document.get_element_by_id(CONFIG_ELEMENT_ID) {
            Some(el) => Self::from_json(&el.text_content().unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_page() {
        let config = Config::default();
        assert_eq!(config.particles.count, 55);
        assert_eq!(config.reveal.root_margin, "0px 0px -60px 0px");
        assert_eq!(config.counter.duration_ms, 1400.0);
        assert_eq!(config.nav.section_offset, 120.0);
        assert_eq!(config.theme.storage_key, "kg-tema");
        assert_eq!(config.easter_egg.dwell_ms, 3500);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = Config::from_json(r#"{"particles": {"count": 12}, "log_level": "debug"}"#)
            .unwrap();
        assert_eq!(config.particles.count, 12);
        assert_eq!(config.particles.primary_color, "#D4A017");
        assert_eq!(config.counter, CounterConfig::default());
        assert_eq!(config.log_level(), log::Level::Debug);
    }

    #[test]
    fn blank_block_means_defaults() {
        assert_eq!(Config::from_json("  \n").unwrap(), Config::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Config::from_json("{particles:").is_err());
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = Config::from_json(r#"{"log_level": "loud"}"#).unwrap();
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
