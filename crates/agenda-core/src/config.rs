use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding project state, relative to the project root.
pub const AGENDA_DIR: &str = ".agenda";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_uploads")]
    pub uploads: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            uploads: default_uploads(),
        }
    }
}

impl StorageConfig {
    /// Database path, resolved against `project_root` when relative.
    #[must_use]
    pub fn database_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.database)
    }

    /// Uploads directory, resolved against `project_root` when relative.
    #[must_use]
    pub fn uploads_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.uploads)
    }
}

/// Limits applied when validating new activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_backdate_grace_days")]
    pub backdate_grace_days: u32,
    #[serde(default = "default_schedule_horizon_days")]
    pub schedule_horizon_days: u32,
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    #[serde(default = "default_max_description_words")]
    pub max_description_words: usize,
    #[serde(default = "default_max_activity_type_chars")]
    pub max_activity_type_chars: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            backdate_grace_days: default_backdate_grace_days(),
            schedule_horizon_days: default_schedule_horizon_days(),
            max_images: default_max_images(),
            max_image_bytes: default_max_image_bytes(),
            max_description_words: default_max_description_words(),
            max_activity_type_chars: default_max_activity_type_chars(),
        }
    }
}

/// Effectiveness banding thresholds, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_good_threshold")]
    pub good_threshold: u8,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: u8,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            good_threshold: default_good_threshold(),
            warning_threshold: default_warning_threshold(),
        }
    }
}

impl ReportConfig {
    /// Thresholds must satisfy `warning <= good <= 100`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending threshold.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.good_threshold <= 100,
            "good_threshold {} exceeds 100",
            self.good_threshold
        );
        anyhow::ensure!(
            self.warning_threshold <= self.good_threshold,
            "warning_threshold {} is above good_threshold {}",
            self.warning_threshold,
            self.good_threshold
        );
        Ok(())
    }
}

/// Path of the project config file under `project_root`.
#[must_use]
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(AGENDA_DIR).join("config.toml")
}

/// Load `.agenda/config.toml`, falling back to defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// its report thresholds are inconsistent.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .report
        .validate()
        .with_context(|| format!("Invalid [report] thresholds in {}", path.display()))?;
    Ok(config)
}

/// Render the default config as TOML, used by `agenda init`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&ProjectConfig::default()).context("serialize default config")
}

fn default_database() -> PathBuf {
    PathBuf::from(AGENDA_DIR).join("agenda.db")
}

fn default_uploads() -> PathBuf {
    PathBuf::from(AGENDA_DIR).join("uploads")
}

const fn default_backdate_grace_days() -> u32 {
    14
}

const fn default_schedule_horizon_days() -> u32 {
    365
}

const fn default_max_images() -> usize {
    5
}

const fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

const fn default_max_description_words() -> usize {
    200
}

const fn default_max_activity_type_chars() -> usize {
    100
}

const fn default_good_threshold() -> u8 {
    70
}

const fn default_warning_threshold() -> u8 {
    40
}
