use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub settings: Settings,
    pub catalogs: Catalogs,
    pub theme: Theme,
}

/// Where the Incidex web app lives and how to talk to it as the logged-in user
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Value of the `csrf_token` hidden field the server renders into its forms
    pub csrf_token: String,
    /// Raw `Cookie` header of an authenticated browser session
    pub session_cookie: Option<String>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API request timeout in seconds
    pub api_timeout: u64,
    /// Default tracing filter, overridden by RUST_LOG
    pub log_level: String,
    /// Log file path (the TUI owns stdout)
    pub log_file: Option<PathBuf>,
}

/// One option of a server-rendered `<select>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub categories: Vec<CatalogEntry>,
    pub departments: Vec<CatalogEntry>,
    pub priorities: Vec<CatalogEntry>,
    pub statuses: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub border_active: String,
    pub selected_bg: String,
    pub text: String,
    pub text_muted: String,
    pub highlight: String,
    pub advice: String,
    pub chip: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            csrf_token: String::new(),
            session_cookie: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_timeout: 30,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // One Dark color scheme
            border: "#5c6370".to_string(),        // Gray
            border_active: "#61afef".to_string(), // Blue
            selected_bg: "#2c323c".to_string(),   // Dark gray
            text: "#abb2bf".to_string(),          // Light gray
            text_muted: "#5c6370".to_string(),    // Muted gray
            highlight: "#61afef".to_string(),     // Blue
            advice: "#e5c07b".to_string(),        // Yellow
            chip: "#98c379".to_string(),          // Green
        }
    }
}

impl Config {
    /// Load from an explicit path, failing loudly if it cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Look in the usual places and fall back to defaults.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                match toml::from_str::<Config>(&contents) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config"),
                }
            }
        }
        Config::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        // XDG path first, the usual place on Linux and common on macOS
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("incidex").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("incidex").join("config.toml"));
        }
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".incidex.toml"));
        }
        paths
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.settings
            .log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("incidex").join("incidex.log")))
    }
}

impl Theme {
    pub fn parse_color(&self, hex: &str) -> ratatui::style::Color {
        // Parse hex color string (e.g., "#61afef")
        if hex.starts_with('#') && hex.len() == 7 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[1..3], 16),
                u8::from_str_radix(&hex[3..5], 16),
                u8::from_str_radix(&hex[5..7], 16),
            ) {
                return ratatui::style::Color::Rgb(r, g, b);
            }
        }
        ratatui::style::Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            csrf_token = "abc"

            [[catalogs.departments]]
            id = 3
            name = "Redes"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.server.csrf_token, "abc");
        assert_eq!(config.settings.api_timeout, 30);
        assert_eq!(config.catalogs.departments, vec![CatalogEntry { id: 3, name: "Redes".into() }]);
        assert!(config.catalogs.categories.is_empty());
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_parse_color() {
        let theme = Theme::default();
        assert_eq!(theme.parse_color("#61afef"), ratatui::style::Color::Rgb(0x61, 0xaf, 0xef));
        assert_eq!(theme.parse_color("blue"), ratatui::style::Color::White);
    }
}
