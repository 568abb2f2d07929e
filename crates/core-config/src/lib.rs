//! Configuration loading and parsing.
//!
//! Parses `modkey.toml` (or an override path provided by the binary)
//! extracting the `[input]` and `[search]` tables. Missing file or
//! parse error falls back to defaults so the interpreter always starts.
//! The platform-conditional word modifier is resolved exactly once here
//! (`Config::resolve`) into a value the motion table consumes; call
//! sites never re-branch on the operating system.

use anyhow::Result;
use core_host::WordModifier;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Letter completing the Ctrl chord that suspends Insert for one
    /// Normal command.
    #[serde(default = "InputConfig::default_temp_normal_chord")]
    pub temp_normal_chord: char,
    /// Word/paragraph navigation modifier: `auto`, `control`, or `alt`.
    #[serde(default)]
    pub word_modifier: WordModifierChoice,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            temp_normal_chord: Self::default_temp_normal_chord(),
            word_modifier: WordModifierChoice::default(),
        }
    }
}

impl InputConfig {
    const fn default_temp_normal_chord() -> char {
        'o'
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordModifierChoice {
    #[default]
    Auto,
    Control,
    Alt,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Bounded retry: probe attempts while waiting on the find overlay.
    #[serde(default = "SearchConfig::default_attempts")]
    pub attempts: u32,
    /// Interval between probe attempts, in milliseconds.
    #[serde(default = "SearchConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attempts: Self::default_attempts(),
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl SearchConfig {
    const fn default_attempts() -> u32 {
        10
    }
    const fn default_interval_ms() -> u64 {
        50
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Overall budget the interpreter allows the overlay before the
    /// guaranteed finalize fires: the full retry window plus slack for
    /// the overlay's own open/dismiss steps.
    pub fn submit_budget(&self) -> Duration {
        let window = self
            .interval()
            .saturating_mul(self.attempts.max(1))
            .saturating_add(Duration::from_millis(250));
        window.saturating_mul(2)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Original file string, when one was read.
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("modkey.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("modkey").join("modkey.toml");
    }
    PathBuf::from("modkey.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
            }),
            Err(e) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "config_parse_failed_using_defaults"
                );
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

impl Config {
    /// Collapse the `auto` word-modifier choice for the current
    /// platform. Called once at startup; the result is baked into the
    /// motion table.
    pub fn resolve_word_modifier(&self) -> WordModifier {
        self.resolve_word_modifier_for(cfg!(target_os = "macos"))
    }

    /// Testable split: resolve against an explicit platform flag.
    pub fn resolve_word_modifier_for(&self, is_macos: bool) -> WordModifier {
        match self.file.input.word_modifier {
            WordModifierChoice::Control => WordModifier::Control,
            WordModifierChoice::Alt => WordModifier::Alt,
            WordModifierChoice::Auto => {
                let resolved = if is_macos {
                    WordModifier::Alt
                } else {
                    WordModifier::Control
                };
                info!(target: "config", ?resolved, is_macos, "word_modifier_auto_resolved");
                resolved
            }
        }
    }
}
