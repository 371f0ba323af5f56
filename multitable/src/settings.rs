use crate::info;
use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

static DOTENV_ONCE: Once = Once::new();

fn ensure_dotenv_loaded() {
    DOTENV_ONCE.call_once(|| {
        match dotenv() {
            Ok(_) => info!("Config loaded including .env file."),
            Err(_) => info!("Config loaded without .env file."),
        }
    });
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}

fn default_cache_size_mb() -> usize { 64 }
fn default_open_attempts() -> usize { 3 }
fn default_open_retry_delay() -> Duration { Duration::from_millis(200) }

/// Where the shared collection lives and how to open it.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub db_path: String,
    pub collection: String,
    #[serde(default = "default_cache_size_mb")]
    pub cache_size_mb: usize,
    #[serde(default = "default_open_attempts")]
    pub open_attempts: usize,
    #[serde(default = "default_open_retry_delay", deserialize_with = "duration_from_millis", rename = "open_retry_delay_ms")]
    pub open_retry_delay: Duration,
}

impl StoreSettings {
    pub fn new(db_path: impl Into<String>, collection: impl Into<String>) -> Self {
        StoreSettings {
            db_path: db_path.into(),
            collection: collection.into(),
            cache_size_mb: default_cache_size_mb(),
            open_attempts: default_open_attempts(),
            open_retry_delay: default_open_retry_delay(),
        }
    }

    pub fn db_file(&self) -> PathBuf {
        PathBuf::from(&self.db_path).join(format!("{}.redb", self.collection))
    }
}

pub fn load_config<T>(path: &str, prefix: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Debug,
{
    ensure_dotenv_loaded();

    let builder = Config::builder()
        .add_source(File::with_name(path).required(true))
        .add_source(
            Environment::with_prefix(prefix)
                .try_parsing(true)
                .separator("__"),
        );

    let cfg = builder.build()?.try_deserialize::<T>()?;
    info!("{:#?}", cfg);
    Ok(cfg)
}

/// Reads the `[store]` section of `path`, overridable by `<PREFIX>__STORE__<KEY>` variables.
pub fn load_settings(path: &str, prefix: &str) -> Result<StoreSettings, ConfigError> {
    #[derive(Debug, Deserialize)]
    struct Root {
        store: StoreSettings,
    }
    load_config::<Root>(path, prefix).map(|root| root.store)
}
