// Build script - reads config.yaml at compile time and generates defaults
// This allows changing defaults during development without editing source code

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Tell Cargo to rerun if config.yaml changes
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("compiled_config.rs");

    // Try to read config.yaml from src/, fall back to hardcoded defaults if not found
    let config = if Path::new("src/config.yaml").exists() {
        let content = fs::read_to_string("src/config.yaml")
            .expect("Failed to read src/config.yaml");
        parse_config(&content)
    } else {
        CompiledConfig::default()
    };

    let generated = format!(
        r#"// Auto-generated from config.yaml at compile time
// Do not edit - modify config.yaml and rebuild instead

pub const RENAME_ON_CONFLICT: bool = {rename_on_conflict};
pub const DELETE_EMPTY_SOURCES: bool = {delete_empty_sources};
pub const PRESERVE_STRUCTURE: bool = {preserve_structure};
pub const WRITE_LOG: bool = {write_log};
pub const LOG_DIR: &str = {log_dir:?};

pub const TICK_RATE_MS: u64 = {tick_rate_ms};
pub const RECENT_MOVES: usize = {recent_moves};
"#,
        rename_on_conflict = config.rename_on_conflict,
        delete_empty_sources = config.delete_empty_sources,
        preserve_structure = config.preserve_structure,
        write_log = config.write_log,
        log_dir = config.log_dir,
        tick_rate_ms = config.tick_rate_ms,
        recent_moves = config.recent_moves,
    );

    fs::write(&dest_path, generated).expect("Failed to write compiled config");
}

struct CompiledConfig {
    rename_on_conflict: bool,
    delete_empty_sources: bool,
    preserve_structure: bool,
    write_log: bool,
    log_dir: String,
    tick_rate_ms: u64,
    recent_moves: usize,
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            rename_on_conflict: true,
            delete_empty_sources: false,
            preserve_structure: false,
            write_log: true,
            log_dir: ".".to_string(),
            tick_rate_ms: 100,
            recent_moves: 500,
        }
    }
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();

    // Simple YAML parsing (avoiding external dependencies in build script)
    let mut in_defaults = false;
    let mut in_ui = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("defaults:") {
            in_defaults = true;
            in_ui = false;
            continue;
        } else if trimmed.starts_with("ui:") {
            in_defaults = false;
            in_ui = true;
            continue;
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };

        if in_defaults {
            match key {
                "rename_on_conflict" => config.rename_on_conflict = parse_bool(value),
                "delete_empty_sources" => config.delete_empty_sources = parse_bool(value),
                "preserve_structure" => config.preserve_structure = parse_bool(value),
                "write_log" => config.write_log = parse_bool(value),
                "log_dir" => config.log_dir = unquote(value).to_string(),
                _ => {}
            }
        } else if in_ui {
            match key {
                "tick_rate_ms" => config.tick_rate_ms = value.parse().unwrap_or(100),
                "recent_moves" => config.recent_moves = value.parse().unwrap_or(500),
                _ => {}
            }
        }
    }

    config
}

fn parse_kv(line: &str) -> Option<(&str, &str)> {
    // Skip comments and empty lines
    if line.starts_with('#') || line.is_empty() {
        return None;
    }

    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    let mut value = line[colon_pos + 1..].trim();

    // Remove inline comments
    if let Some(comment_pos) = value.find(" #") {
        value = value[..comment_pos].trim();
    }

    // Skip if value is empty (section header)
    if value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "yes" | "1")
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'')
}
