use shared_types::AppConfig;
use std::path::Path;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
pub const CONFIG_PATH: &str = "config.toml";

/// Parse a config file. A missing or unparseable file yields the defaults.
///
/// Runs before logging is set up (the log level lives in the file), so
/// problems are reported on stderr.
pub fn read_config(path: &Path) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("[config] Failed to parse {}: {e}, using defaults", path.display());
            AppConfig::default()
        }),
        Err(e) => {
            eprintln!("[config] {} not found ({e}), using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Read `config.toml` and store it in the global `OnceLock`. Safe to call
/// multiple times; only the first call has effect.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let config = read_config(Path::new(CONFIG_PATH));
        eprintln!("[config] Feature flags: {:?}", config.features);
        config
    })
}
