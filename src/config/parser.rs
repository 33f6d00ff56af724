use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use serp_rake::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Engine: {}", config.scraper.engine);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[scraper]
engine = "google"
keywords = ["rust web scraping", "serp api"]
pages-to-scrape = 2

[throttle]
global-threshold = 20
component-threshold = 5

[output]
format = "json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.engine, "google");
        assert_eq!(config.scraper.keywords.len(), 2);
        assert_eq!(config.scraper.pages_to_scrape, 2);
        assert_eq!(config.throttle.global_threshold, 20);
        assert_eq!(config.throttle.component_threshold, Some(5));
    }

    #[test]
    fn test_defaults_are_applied() {
        let config_content = r#"
[scraper]
engine = "bing"
keywords = ["foo"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.pages_to_scrape, 1);
        assert_eq!(config.scraper.out_dir, "out");
        assert_eq!(config.scraper.cache_ttl_hours, 24);
        assert_eq!(config.scraper.request_delay_ms, 500);
        assert_eq!(config.scraper.timezone, "UTC");
        assert_eq!(config.throttle.global_threshold, 15);
        assert_eq!(config.throttle.component_threshold, None);
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[scraper]
engine = "google"
keywords = ["foo"]
cache-ttl-hours = 0
"#;

        let file = create_temp_config(config_content);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
