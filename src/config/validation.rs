use crate::config::types::Config;
use crate::engine::Engine;
use crate::keywords;
use crate::output::prevent_cache_collision;
use crate::page::Format;
use crate::ConfigError;
use chrono_tz::Tz;

/// Validates the entire configuration
///
/// These are construction-time checks: any violation is a configuration
/// error that aborts the build, in contrast with the boolean soft contract
/// of the scrape-time operations.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine(&config.scraper.engine)?;
    validate_keywords(&config.scraper.keywords)?;
    validate_dirs(config)?;
    validate_timings(config)?;
    validate_thresholds(config)?;
    validate_output(config)?;
    Ok(())
}

fn validate_engine(engine: &str) -> Result<(), ConfigError> {
    engine
        .parse::<Engine>()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;
    Ok(())
}

fn validate_keywords(keywords: &[String]) -> Result<(), ConfigError> {
    if !keywords::valid_keywords(keywords) {
        return Err(ConfigError::Validation(
            "keywords must be a non-empty list of non-empty single-line strings under 180 characters"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_dirs(config: &Config) -> Result<(), ConfigError> {
    for (name, dir) in [
        ("out-dir", &config.scraper.out_dir),
        ("fetcher-cache-dir", &config.scraper.fetcher_cache_dir),
        ("serializer-cache-dir", &config.scraper.serializer_cache_dir),
    ] {
        if dir.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{name} must be a non-empty path"
            )));
        }
    }

    if !prevent_cache_collision(
        &config.scraper.out_dir,
        &config.scraper.fetcher_cache_dir,
        &config.scraper.serializer_cache_dir,
    ) {
        return Err(ConfigError::Validation(
            "out-dir, fetcher-cache-dir and serializer-cache-dir must be pairwise distinct"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_timings(config: &Config) -> Result<(), ConfigError> {
    if config.scraper.cache_ttl_hours == 0 {
        return Err(ConfigError::Validation(
            "cache-ttl-hours must be a positive integer".to_string(),
        ));
    }

    if config.scraper.request_delay_ms == 0 {
        return Err(ConfigError::Validation(
            "request-delay-ms must be a positive integer".to_string(),
        ));
    }

    if config.scraper.timezone.parse::<Tz>().is_err() {
        return Err(ConfigError::Validation(format!(
            "timezone '{}' is not a recognized identifier",
            config.scraper.timezone
        )));
    }

    Ok(())
}

fn validate_thresholds(config: &Config) -> Result<(), ConfigError> {
    if config.throttle.global_threshold == 0 {
        return Err(ConfigError::Validation(
            "global-threshold must be a positive integer".to_string(),
        ));
    }

    if config.throttle.component_threshold == Some(0) {
        return Err(ConfigError::Validation(
            "component-threshold must be a positive integer when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output.format.parse::<Format>().is_err() {
        return Err(ConfigError::Validation(format!(
            "format '{}' is not one of json, xml, yml",
            config.output.format
        )));
    }
    Ok(())
}
