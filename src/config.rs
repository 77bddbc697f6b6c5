//! Configuration file handling.
//!
//! The configuration file is stored at `$STOCKROOM_HOME/config.json` and carries the settings
//! that outlive a single invocation: which storage backend is active, the purchase policy, the
//! backup rotation depth, and the valid class groups.

use crate::backup::Backup;
use crate::store::{JsonStore, SqliteStore, Store};
use crate::summary::PurchasePolicy;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "stockroom";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const STORE_JSON: &str = "stockroom.json";
const STORE_SQLITE: &str = "stockroom.sqlite";

/// Which persistence backend holds the collections. Both expose the same [`Store`] contract;
/// the choice is made once at `init`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// A single JSON document, written atomically.
    #[default]
    Json,
    /// A SQLite database with one table per collection.
    Sqlite,
}

serde_plain::derive_display_from_serialize!(Backend);
serde_plain::derive_fromstr_from_deserialize!(Backend);

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$STOCKROOM_HOME` and from there it loads `$STOCKROOM_HOME/config.json`. It owns
/// path resolution within the data directory and constructs the configured [`Store`].
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and its contents:
    /// - the `.backups` subdirectory,
    /// - an initial `config.json` with the chosen backend and purchase policy,
    /// - the backend's empty store (for sqlite, the database file and schema).
    ///
    /// # Errors
    /// - Returns an error if any file operation fails or if the directory is already
    ///   initialized.
    pub async fn create(
        dir: impl Into<PathBuf>,
        backend: Backend,
        purchase_policy: PurchasePolicy,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the stockroom home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "A stockroom data directory already exists at '{}'",
                root.display()
            )
        }
        let config_file = ConfigFile {
            backend,
            purchase_policy,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            backups,
            config_path,
            config_file,
        };

        if backend == Backend::Sqlite {
            SqliteStore::create(config.sqlite_path())
                .await
                .context("Unable to create the SQLite database")?;
        }

        Ok(config)
    }

    /// This will
    /// - validate that `home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Stockroom home is missing, run 'stockroom init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    /// Constructs the configured storage backend.
    pub async fn store(&self) -> Result<Box<dyn Store>> {
        Ok(match self.backend() {
            Backend::Json => Box::new(JsonStore::new(self.store_json_path())),
            Backend::Sqlite => Box::new(
                SqliteStore::open(self.sqlite_path())
                    .await
                    .context("Unable to open the SQLite database")?,
            ),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backend(&self) -> Backend {
        self.config_file.backend
    }

    pub fn purchase_policy(&self) -> PurchasePolicy {
        self.config_file.purchase_policy
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn class_groups(&self) -> &[String] {
        &self.config_file.class_groups
    }

    pub fn store_json_path(&self) -> PathBuf {
        self.root.join(STORE_JSON)
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.root.join(STORE_SQLITE)
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "stockroom",
///   "config_version": 1,
///   "backend": "json",
///   "purchase_policy": "fixed_target",
///   "backup_copies": 5,
///   "class_groups": ["Turma A - Manhã", "Turma B - Tarde"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "stockroom"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The active storage backend
    backend: Backend,

    /// Which target the purchase recommendation is measured against
    purchase_policy: PurchasePolicy,

    /// Number of backup copies to keep per prefix
    backup_copies: u32,

    /// The valid class groups students can belong to
    class_groups: Vec<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend: Backend::default(),
            purchase_policy: PurchasePolicy::default(),
            backup_copies: BACKUP_COPIES,
            class_groups: default_class_groups(),
        }
    }
}

fn default_class_groups() -> Vec<String> {
    [
        "Turma A - Manhã",
        "Turma B - Manhã",
        "Turma A - Tarde",
        "Turma B - Tarde",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load_json_backend() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("stockroom_home");

        let created = Config::create(&home, Backend::Json, PurchasePolicy::FixedTarget)
            .await
            .unwrap();
        assert!(created.backups().is_dir());
        assert!(created.config_path().is_file());

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.backend(), Backend::Json);
        assert_eq!(loaded.purchase_policy(), PurchasePolicy::FixedTarget);
        assert_eq!(loaded.backup_copies(), 5);
        assert_eq!(loaded.class_groups().len(), 4);
    }

    #[tokio::test]
    async fn test_config_create_sqlite_backend_initializes_db() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");

        let config = Config::create(&home, Backend::Sqlite, PurchasePolicy::RemainingStudents)
            .await
            .unwrap();
        assert!(config.sqlite_path().is_file());

        // The loaded config can open its store.
        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.purchase_policy(), PurchasePolicy::RemainingStudents);
        loaded.store().await.unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "backend": "json",
            "purchase_policy": "fixed_target",
            "backup_copies": 5,
            "class_groups": []
        }"#;
        std::fs::write(&path, json).unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = ConfigFile {
            backend: Backend::Sqlite,
            purchase_policy: PurchasePolicy::RemainingStudents,
            backup_copies: 7,
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();

        let loaded = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_backend_plain_strings() {
        assert_eq!(Backend::Json.to_string(), "json");
        assert_eq!(Backend::Sqlite.to_string(), "sqlite");
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
    }
}
