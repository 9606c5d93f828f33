use num_cpus;
use serde_yaml;
use std::fs;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub target: Vec<String>,
    pub port: u16,
    pub probe1: String,
    pub probe2: String,
    pub timeout: u64,
    pub read_timeout: u64,
    pub threads: u64,
    pub json: Option<String>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: vec![],
            port: 25565,
            probe1: "\\n".to_string(),
            probe2: "\\n".to_string(),
            timeout: 2000,
            read_timeout: 5000,
            threads: num_cpus::get() as u64,
            json: None,
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Merge YAML values over the defaults, allowing partial config files
    fn from_yaml(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)?;

        let mut config = Config::default();

        if let serde_yaml::Value::Mapping(map) = yaml_value {
            for (key, value) in map {
                if let serde_yaml::Value::String(key_str) = key {
                    match key_str.as_str() {
                        "target" => {
                            if let Ok(targets) = serde_yaml::from_value::<Vec<String>>(value) {
                                config.target = targets;
                            }
                        }
                        "port" => {
                            if let Ok(port) = serde_yaml::from_value::<u16>(value) {
                                config.port = port;
                            }
                        }
                        "probe1" => {
                            if let Ok(probe1) = serde_yaml::from_value::<String>(value) {
                                config.probe1 = probe1;
                            }
                        }
                        "probe2" => {
                            if let Ok(probe2) = serde_yaml::from_value::<String>(value) {
                                config.probe2 = probe2;
                            }
                        }
                        "timeout" => {
                            if let Ok(timeout) = serde_yaml::from_value::<u64>(value) {
                                config.timeout = timeout;
                            }
                        }
                        "read_timeout" => {
                            if let Ok(read_timeout) = serde_yaml::from_value::<u64>(value) {
                                config.read_timeout = read_timeout;
                            }
                        }
                        "threads" => {
                            if let Ok(threads) = serde_yaml::from_value::<u64>(value) {
                                config.threads = threads;
                            }
                        }
                        "json" => {
                            if let Ok(json) = serde_yaml::from_value::<Option<String>>(value) {
                                config.json = json;
                            }
                        }
                        "verbose" => {
                            if let Ok(verbose) = serde_yaml::from_value::<bool>(value) {
                                config.verbose = verbose;
                            }
                        }

                        _ => {} // Ignore unknown fields
                    }
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let config = Config::from_yaml("target:\n  - example.com\nport: 2000\n").unwrap();
        assert_eq!(config.target, vec!["example.com".to_string()]);
        assert_eq!(config.port, 2000);
        assert_eq!(config.probe1, "\\n");
        assert_eq!(config.read_timeout, 5000);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = Config::from_yaml("nonsense: true\n").unwrap();
        assert!(config.target.is_empty());
    }
}
