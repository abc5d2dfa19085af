use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use snip_config::Config;

pub const MAIN_PROFILE: &str = "main";

/// A named, saved configuration
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Profiles stored as `<root>/<name>.json`
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// `<config dir>/snip/profiles`, or `None` when the platform has no home directory
    pub fn default_location() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "snip")?;
        Some(Self::at(dirs.config_dir().join("profiles")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Create the profile folder and a main profile from defaults if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let main_profile = self.path_for(MAIN_PROFILE);
        if !main_profile.exists() {
            self.write(MAIN_PROFILE, Config::default())?;
            tracing::info!("Created main profile in {}", self.root.display());
        }

        Ok(())
    }

    /// Load a profile by name, falling back to main and then to defaults
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let profile_file = self.path_for(name);
        if profile_file.exists() {
            return read_profile(&profile_file);
        }

        tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
        let main_file = self.path_for(MAIN_PROFILE);
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            Ok(Config::default())
        }
    }

    /// Add a new profile cloned from main. Existing profiles are never overwritten.
    pub fn add_from_main(&self, new_name: &str) -> anyhow::Result<PathBuf> {
        if new_name.is_empty()
            || !new_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("Invalid profile name '{new_name}'");
        }
        if self.path_for(new_name).exists() {
            anyhow::bail!("Profile {new_name} already exists");
        }

        let config = self.load(MAIN_PROFILE)?;
        let file = self.write(new_name, config)?;
        tracing::info!("Created new profile: {new_name}");
        Ok(file)
    }

    fn write(&self, name: &str, value: Config) -> anyhow::Result<PathBuf> {
        let profile = Profile {
            name: name.into(),
            value,
        };
        let file = self.path_for(name);
        fs::write(&file, serde_json::to_string_pretty(&profile)?)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(file)
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}
