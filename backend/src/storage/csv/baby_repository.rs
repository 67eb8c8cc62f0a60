//! File-based baby profile repository using filesystem discovery.

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::age;
use crate::domain::models::baby::Baby as DomainBaby;
use crate::storage::traits::BabyStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlBaby {
    id: String,
    name: String,
    birthdate: String,
    due_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl YamlBaby {
    fn from_domain(baby: &DomainBaby) -> Self {
        Self {
            id: baby.id.clone(),
            name: baby.name.clone(),
            birthdate: age::format_date_only(baby.birthdate),
            due_date: baby.due_date.map(age::format_date_only),
            created_at: baby.created_at.to_rfc3339(),
            updated_at: baby.updated_at.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<DomainBaby> {
        let birthdate = age::parse_date_only(&self.birthdate)
            .with_context(|| format!("Invalid birthdate in baby.yaml: {}", self.birthdate))?;
        let due_date = match &self.due_date {
            Some(raw) => Some(
                age::parse_date_only(raw)
                    .with_context(|| format!("Invalid due date in baby.yaml: {}", raw))?,
            ),
            None => None,
        };

        Ok(DomainBaby {
            id: self.id,
            name: self.name,
            birthdate,
            due_date,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .context("Invalid created_at in baby.yaml")?
                .into(),
            updated_at: DateTime::parse_from_rfc3339(&self.updated_at)
                .context("Invalid updated_at in baby.yaml")?
                .into(),
        })
    }
}

/// Global configuration stored next to the baby directories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GlobalConfig {
    active_baby_id: Option<String>,
}

/// File-based baby repository: one directory per baby, discovered by
/// scanning the base directory for `baby.yaml` files.
#[derive(Clone)]
pub struct BabyRepository {
    connection: CsvConnection,
}

impl BabyRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Generate a safe filesystem identifier from a baby name.
    /// "Mia Sophie" -> "mia_sophie", "Jörg" -> "joerg".
    pub fn generate_safe_directory_name(baby_name: &str) -> String {
        let mut result = String::with_capacity(baby_name.len());
        let mut last_was_underscore = true; // swallow leading separators

        for c in baby_name.chars() {
            let mapped: &str = match c {
                'ä' | 'Ä' => "ae",
                'ö' | 'Ö' => "oe",
                'ü' | 'Ü' => "ue",
                'ß' => "ss",
                'é' | 'è' | 'ê' | 'É' | 'È' | 'Ê' => "e",
                'á' | 'à' | 'â' | 'Á' | 'À' | 'Â' => "a",
                c if c.is_ascii_alphanumeric() => {
                    result.push(c.to_ascii_lowercase());
                    last_was_underscore = false;
                    continue;
                }
                _ => {
                    if !last_was_underscore {
                        result.push('_');
                        last_was_underscore = true;
                    }
                    continue;
                }
            };
            result.push_str(mapped);
            last_was_underscore = false;
        }

        result.trim_end_matches('_').to_string()
    }

    fn baby_yaml_path(&self, directory_name: &str) -> PathBuf {
        self.connection.baby_directory(directory_name).join("baby.yaml")
    }

    fn global_config_path(&self) -> PathBuf {
        self.connection.base_directory().join("global_config.yaml")
    }

    /// Discover all babies by scanning directories
    fn discover_babies(&self) -> Result<Vec<(PathBuf, DomainBaby)>> {
        let base_dir = self.connection.base_directory();
        if !base_dir.exists() {
            debug!("Base directory doesn't exist, returning empty baby list");
            return Ok(Vec::new());
        }

        let mut babies = Vec::new();
        for entry in fs::read_dir(base_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            let yaml_path = path.join("baby.yaml");
            if !yaml_path.exists() {
                continue;
            }

            let content = fs::read_to_string(&yaml_path)
                .with_context(|| format!("Failed to read {}", yaml_path.display()))?;
            match serde_yaml::from_str::<YamlBaby>(&content) {
                Ok(yaml_baby) => match yaml_baby.into_domain() {
                    Ok(baby) => babies.push((path, baby)),
                    Err(err) => warn!("Skipping {}: {:#}", yaml_path.display(), err),
                },
                Err(err) => warn!("Skipping unparseable {}: {}", yaml_path.display(), err),
            }
        }

        Ok(babies)
    }

    /// Find the directory holding a baby by ID
    fn find_baby_directory(&self, baby_id: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .discover_babies()?
            .into_iter()
            .find(|(_, baby)| baby.id == baby_id)
            .map(|(path, _)| path))
    }

    /// Directory of a baby by ID, for sibling repositories (activity files
    /// live next to baby.yaml)
    pub fn baby_directory_for_id(&self, baby_id: &str) -> Result<Option<PathBuf>> {
        self.find_baby_directory(baby_id)
    }

    fn write_yaml(&self, path: &PathBuf, baby: &DomainBaby) -> Result<()> {
        let yaml = serde_yaml::to_string(&YamlBaby::from_domain(baby))
            .context("Failed to serialize baby.yaml")?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn read_global_config(&self) -> Result<GlobalConfig> {
        let path = self.global_config_path();
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn write_global_config(&self, config: &GlobalConfig) -> Result<()> {
        let path = self.global_config_path();
        let yaml = serde_yaml::to_string(config).context("Failed to serialize global config")?;
        fs::write(&path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl BabyStorage for BabyRepository {
    fn store_baby(&self, baby: &DomainBaby) -> Result<()> {
        let dir_name = Self::generate_safe_directory_name(&baby.name);
        if dir_name.is_empty() {
            bail!("Baby name '{}' produces an empty directory name", baby.name);
        }

        let yaml_path = self.baby_yaml_path(&dir_name);
        if yaml_path.exists() {
            let existing = fs::read_to_string(&yaml_path)?;
            let existing: YamlBaby = serde_yaml::from_str(&existing)
                .with_context(|| format!("Failed to parse {}", yaml_path.display()))?;
            if existing.id != baby.id {
                bail!(
                    "Baby directory '{}' is already used by {}",
                    dir_name,
                    existing.id
                );
            }
        }

        self.connection.ensure_baby_directory(&dir_name)?;
        self.write_yaml(&yaml_path, baby)?;

        info!("Stored baby {} in directory {}", baby.id, dir_name);
        Ok(())
    }

    fn get_baby(&self, baby_id: &str) -> Result<Option<DomainBaby>> {
        Ok(self
            .discover_babies()?
            .into_iter()
            .map(|(_, baby)| baby)
            .find(|baby| baby.id == baby_id))
    }

    fn list_babies(&self) -> Result<Vec<DomainBaby>> {
        let mut babies: Vec<DomainBaby> = self
            .discover_babies()?
            .into_iter()
            .map(|(_, baby)| baby)
            .collect();
        babies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(babies)
    }

    fn update_baby(&self, baby: &DomainBaby) -> Result<()> {
        let dir = self
            .find_baby_directory(&baby.id)?
            .with_context(|| format!("Baby not found: {}", baby.id))?;

        // The directory keeps its original name even if the baby was
        // renamed; activity files must stay next to the profile.
        self.write_yaml(&dir.join("baby.yaml"), baby)?;

        info!("Updated baby {}", baby.id);
        Ok(())
    }

    fn delete_baby(&self, baby_id: &str) -> Result<()> {
        let dir = self
            .find_baby_directory(baby_id)?
            .with_context(|| format!("Baby not found: {}", baby_id))?;

        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete {}", dir.display()))?;

        let mut config = self.read_global_config()?;
        if config.active_baby_id.as_deref() == Some(baby_id) {
            config.active_baby_id = None;
            self.write_global_config(&config)?;
        }

        info!("Deleted baby {} and its data directory", baby_id);
        Ok(())
    }

    fn get_active_baby(&self) -> Result<Option<String>> {
        Ok(self.read_global_config()?.active_baby_id)
    }

    fn set_active_baby(&self, baby_id: &str) -> Result<()> {
        if self.get_baby(baby_id)?.is_none() {
            bail!("Cannot activate unknown baby: {}", baby_id);
        }

        let mut config = self.read_global_config()?;
        config.active_baby_id = Some(baby_id.to_string());
        self.write_global_config(&config)?;

        info!("Active baby set to {}", baby_id);
        Ok(())
    }
}
