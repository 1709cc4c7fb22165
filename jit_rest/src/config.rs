use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "0.0.0.0".to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }
}

/// Reads the YAML server config, falling back to defaults when no file
/// exists at the given path.
pub fn read_config(path: &Path) -> Result<ServerConfig> {
    if !path.exists() {
        return Ok(ServerConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read server config at {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse server config at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_temp_config(contents: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let path = env::temp_dir().join(format!("jit-config-{}.yaml", nanos));
        fs::write(&path, contents).expect("write temp yaml");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = read_config(Path::new("/nonexistent/jit-config.yaml")).unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = write_temp_config("host: \"127.0.0.1\"\nport: 9000\n");
        let config = read_config(&path).unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 9000);
        fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let path = write_temp_config("port: [not a port\n");
        assert!(read_config(&path).is_err());
        fs::remove_file(path).ok();
    }
}
