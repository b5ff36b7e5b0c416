// Merge Configuration
// The immutable settings for one merge run, and YAML merge profiles that feed them

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::app_config::MergeDefaults;
use super::MergeError;
use crate::utilities::{normalize_path, resolve_path};

/// Settings for a single merge run.
///
/// Built up front with the `with_*` methods and then handed to the engine,
/// which only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    sources: Vec<PathBuf>,
    target: PathBuf,
    rename_on_conflict: bool,
    delete_empty_sources: bool,
    preserve_structure: bool,
    write_log: bool,
    log_dir: PathBuf,
}

impl MergeConfig {
    /// Create a config using the compiled-in option defaults
    pub fn new<I, P>(sources: I, target: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_defaults(sources, target, &MergeDefaults::default())
    }

    pub fn with_defaults<I, P>(sources: I, target: impl Into<PathBuf>, defaults: &MergeDefaults) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut config = Self {
            sources: Vec::new(),
            target: target.into(),
            rename_on_conflict: defaults.rename_on_conflict,
            delete_empty_sources: defaults.delete_empty_sources,
            preserve_structure: defaults.preserve_structure,
            write_log: defaults.write_log,
            log_dir: defaults.log_dir.clone(),
        };
        for source in sources {
            config.push_source(source.into());
        }
        config
    }

    // Identical paths collapse to their first occurrence
    fn push_source(&mut self, source: PathBuf) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.push_source(source.into());
        self
    }

    pub fn with_rename_on_conflict(mut self, enabled: bool) -> Self {
        self.rename_on_conflict = enabled;
        self
    }

    pub fn with_delete_empty_sources(mut self, enabled: bool) -> Self {
        self.delete_empty_sources = enabled;
        self
    }

    pub fn with_preserve_structure(mut self, enabled: bool) -> Self {
        self.preserve_structure = enabled;
        self
    }

    pub fn with_write_log(mut self, enabled: bool) -> Self {
        self.write_log = enabled;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn rename_on_conflict(&self) -> bool {
        self.rename_on_conflict
    }

    pub fn delete_empty_sources(&self) -> bool {
        self.delete_empty_sources
    }

    pub fn preserve_structure(&self) -> bool {
        self.preserve_structure
    }

    pub fn write_log(&self) -> bool {
        self.write_log
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Check the config before a run starts
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.sources.is_empty() {
            return Err(MergeError::NoSourcesSpecified);
        }
        if self.target.as_os_str().is_empty() {
            return Err(MergeError::NoTargetSpecified);
        }
        if let Some(missing) = self.sources.iter().find(|s| !s.is_dir()) {
            return Err(MergeError::SourceNotFound(missing.clone()));
        }
        Ok(())
    }
}

/// A saved merge setup, loaded from YAML.
///
/// Every field is optional so a profile can hold just the parts a user wants
/// to reuse; the rest comes from compiled defaults and command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeProfile {
    /// Source folders, merged in order
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Folder that receives the files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    #[serde(default)]
    pub options: ProfileOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename_on_conflict: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_empty_sources: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_structure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_log: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl MergeProfile {
    /// Load a profile from a file. Relative paths are taken from the profile's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read merge profile: {}", path.display()))?;

        let profile: MergeProfile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse merge profile YAML: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(profile.resolved_against(base))
    }

    /// Load a profile if the file exists
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.is_file() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Save the profile to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize merge profile")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write merge profile: {}", path.display()))?;

        Ok(())
    }

    /// Capture a config so it can be written back out.
    ///
    /// Paths are made absolute against the working directory, since `load`
    /// reads relative paths against the profile's own directory. A log
    /// directory equal to the default is left out so it keeps following the
    /// working directory.
    pub fn from_config(config: &MergeConfig, defaults: &MergeDefaults) -> Result<Self> {
        let log_dir = if config.log_dir() == defaults.log_dir {
            None
        } else {
            Some(absolute(config.log_dir())?)
        };

        Ok(Self {
            sources: config
                .sources()
                .iter()
                .map(|s| absolute(s))
                .collect::<Result<_>>()?,
            target: if config.target().as_os_str().is_empty() {
                None
            } else {
                Some(absolute(config.target())?)
            },
            options: ProfileOptions {
                rename_on_conflict: Some(config.rename_on_conflict()),
                delete_empty_sources: Some(config.delete_empty_sources()),
                preserve_structure: Some(config.preserve_structure()),
                write_log: Some(config.write_log()),
                log_dir,
            },
        })
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        self.sources = self.sources.iter().map(|s| resolve_path(base, s)).collect();
        self.target = self.target.map(|t| resolve_path(base, &t));
        self.options.log_dir = self.options.log_dir.map(|d| resolve_path(base, &d));
        self
    }

    /// Build a run config, filling unset options from `defaults`
    pub fn to_config(&self, defaults: &MergeDefaults) -> MergeConfig {
        let options = &self.options;
        MergeConfig::with_defaults(
            self.sources.iter().cloned(),
            self.target.clone().unwrap_or_default(),
            defaults,
        )
        .with_rename_on_conflict(options.rename_on_conflict.unwrap_or(defaults.rename_on_conflict))
        .with_delete_empty_sources(
            options.delete_empty_sources.unwrap_or(defaults.delete_empty_sources),
        )
        .with_preserve_structure(options.preserve_structure.unwrap_or(defaults.preserve_structure))
        .with_write_log(options.write_log.unwrap_or(defaults.write_log))
        .with_log_dir(options.log_dir.clone().unwrap_or_else(|| defaults.log_dir.clone()))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    Ok(normalize_path(&absolute))
}
