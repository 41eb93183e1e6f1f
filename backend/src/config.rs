//! Configuration management for the Wheat Receiving Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WRT_ prefix

use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Backing files of the record and timeline stores
    pub storage: StorageConfig,

    /// Timeline sample generation
    pub timeline: TimelineConfig,

    /// Read-only dashboard settings served to clients
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Cultivar record CSV
    pub data_file: PathBuf,

    /// Daily timeline CSV
    pub timeline_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimelineConfig {
    /// Generate a sample timeline when the store is empty
    pub generate_sample: bool,

    /// Fixed seed for sample generation; entropy when unset
    #[serde(default)]
    pub sample_seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ThemeConfig {
    pub primary: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
}

/// Dashboard title, theme colors and display labels
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DashboardConfig {
    #[serde(rename(serialize = "dashboardTitle"))]
    pub title: String,
    pub theme: ThemeConfig,
    #[serde(default)]
    pub tab_names: BTreeMap<String, String>,
    #[serde(default)]
    pub graph_titles: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WRT_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let theme = ThemeConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.data_file", "data.csv")?
            .set_default("storage.timeline_file", "timeline_data.csv")?
            .set_default("timeline.generate_sample", true)?
            .set_default("dashboard.title", DEFAULT_TITLE)?
            .set_default("dashboard.theme.primary", theme.primary)?
            .set_default("dashboard.theme.success", theme.success)?
            .set_default("dashboard.theme.warning", theme.warning)?
            .set_default("dashboard.theme.danger", theme.danger)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WRT_ prefix)
            .add_source(
                Environment::with_prefix("WRT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        config.dashboard.fill_missing_labels();
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            timeline: TimelineConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.csv"),
            timeline_file: PathBuf::from("timeline_data.csv"),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            generate_sample: true,
            sample_seed: None,
        }
    }
}

// ============================================================================
// Dashboard Defaults
// ============================================================================

const DEFAULT_TITLE: &str = "Dashboard de Recepção de Trigo 🌾";

const DEFAULT_TAB_NAMES: [(&str, &str); 6] = [
    ("dashboard-tab", "📊 Dashboard & Progresso Individual"),
    ("avancado-tab", "🚀 Gráficos Avançados"),
    ("analise-tab", "📈 Análise Detalhada"),
    ("tabela-tab", "📋 Edição Rápida da Tabela"),
    ("cadastro-tab", "➕ Cadastro & Opções"),
    ("slideshow-tab", "🎬 Slideshow"),
];

const DEFAULT_GRAPH_TITLES: [(&str, &str); 3] = [
    ("barGroupedTitle", "1. Previsto vs. Recebido (Barras Agrupadas)"),
    ("treemapTitle", "2. Proporção do Recebido (Gráfico de Pizza)"),
    ("sankeyTitle", "3. Fluxo de Volume (Sankey Diagram)"),
];

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#0d6efd".to_string(),
            success: "#198754".to_string(),
            warning: "#ffc107".to_string(),
            danger: "#dc3545".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut dashboard = Self {
            title: DEFAULT_TITLE.to_string(),
            theme: ThemeConfig::default(),
            tab_names: BTreeMap::new(),
            graph_titles: BTreeMap::new(),
        };
        dashboard.fill_missing_labels();
        dashboard
    }
}

impl DashboardConfig {
    /// Add default tab names and graph titles for keys the sources left out
    pub fn fill_missing_labels(&mut self) {
        for (key, label) in DEFAULT_TAB_NAMES {
            self.tab_names
                .entry(key.to_string())
                .or_insert_with(|| label.to_string());
        }
        for (key, title) in DEFAULT_GRAPH_TITLES {
            self.graph_titles
                .entry(key.to_string())
                .or_insert_with(|| title.to_string());
        }
    }
}
