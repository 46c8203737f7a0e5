/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    pub max_hp: u32,
    pub fire_count: usize,
    pub item_rounds: u32,         // rounds between healing item spawns
    pub coin_target: u32,         // score needed to leave level 1
    pub coin_target_step: u32,    // added to the target on each level-up
    pub max_level: u32,
    pub hazard_ramp_rounds: u32,  // one extra fire per this many rounds in a level
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_max_hp")]
    max_hp: u32,
    #[serde(default = "default_fire_count")]
    fire_count: usize,
    #[serde(default = "default_item_rounds")]
    item_rounds: u32,
    #[serde(default = "default_coin_target")]
    coin_target: u32,
    #[serde(default = "default_coin_target_step")]
    coin_target_step: u32,
    #[serde(default = "default_max_level")]
    max_level: u32,
    #[serde(default = "default_hazard_ramp")]
    hazard_ramp_rounds: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_max_hp() -> u32 { 4 }
fn default_fire_count() -> usize { 2 }
fn default_item_rounds() -> u32 { 5 }
fn default_coin_target() -> u32 { 50 }
fn default_coin_target_step() -> u32 { 50 }
fn default_max_level() -> u32 { 3 }
fn default_hazard_ramp() -> u32 { 10 }
fn default_log_level() -> String { "info".into() }

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            max_hp: default_max_hp(),
            fire_count: default_fire_count(),
            item_rounds: default_item_rounds(),
            coin_target: default_coin_target(),
            coin_target_step: default_coin_target_step(),
            max_level: default_max_level(),
            hazard_ramp_rounds: default_hazard_ramp(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            seed: None,
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        TomlRules::default().into()
    }
}

// Counters and divisors must stay >= 1.
impl From<TomlRules> for RulesConfig {
    fn from(t: TomlRules) -> Self {
        RulesConfig {
            max_hp: t.max_hp.max(1),
            fire_count: t.fire_count,
            item_rounds: t.item_rounds.max(1),
            coin_target: t.coin_target,
            coin_target_step: t.coin_target_step,
            max_level: t.max_level.max(1),
            hazard_ramp_rounds: t.hazard_ramp_rounds.max(1),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    /// Parse a config document directly. Errors fall back to defaults.
    #[allow(dead_code)]
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => Self::from_toml(cfg),
            Err(e) => {
                eprintln!("Warning: config.toml parse error: {e}");
                Self::default()
            }
        }
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        GameConfig {
            rules: toml_cfg.rules.into(),
            general: GeneralConfig {
                seed: toml_cfg.general.seed,
                log_file: toml_cfg.general.log_file.map(PathBuf::from),
                log_level: toml_cfg.general.log_level,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
