use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Pattern settings live next to the extractor that compiles them
use nutridash_core::ExtractionConfig;

const CONFIG_DIR: &str = "nutridash";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    const fn default_port() -> u16 {
        8080
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Leave empty to run without the persisted store.
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        "sqlite://food_analysis.db?mode=rwc".to_string()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    #[serde(default = "ListenerConfig::default_enabled")]
    pub enabled: bool,
    /// Root of the remote Socket.IO server, without the `/socket.io/` path.
    #[serde(default = "ListenerConfig::default_root_url")]
    pub root_url: String,
    #[serde(default = "ListenerConfig::default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// First frame sent after the connection opens.
    #[serde(default = "ListenerConfig::default_probe")]
    pub probe: String,
    /// Maximum records kept in memory, `0` keeps everything.
    #[serde(default)]
    pub record_capacity: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            root_url: Self::default_root_url(),
            reconnect_delay_secs: Self::default_reconnect_delay_secs(),
            probe: Self::default_probe(),
            record_capacity: 0,
        }
    }
}

impl ListenerConfig {
    const fn default_enabled() -> bool {
        true
    }

    fn default_root_url() -> String {
        "wss://krishna-websocket-123-cbb50832eaae.herokuapp.com".to_string()
    }

    const fn default_reconnect_delay_secs() -> u64 {
        5
    }

    fn default_probe() -> String {
        "2probe".to_string()
    }
}

impl Config {
    /// `~/nutridash`
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        Self::load_or_default_from(&Self::config_path()?)
    }

    pub fn load_or_default_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            tracing::info!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;

        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point listener.root_url at your Socket.IO server");
        println!("   2. Run 'nutridash seed' to load the food catalogue into the database");
        println!("   3. Run 'nutridash serve' and open http://localhost:8080");
        println!();
        println!("🔧 Configuration options:");
        println!("   - database.url: sea-orm URL, empty to disable the persisted endpoints");
        println!("   - listener.reconnect_delay_secs: fixed wait between connection attempts");
        println!("   - listener.record_capacity: records kept in memory (0 = all)");
        println!("   - extraction.*_pattern: regexes for food and calorie mentions");
        println!();
        Ok(())
    }

    /// Write the default config as pretty JSON. Refuses to overwrite.
    pub fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let content = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}
