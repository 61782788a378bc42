//! Tests for configuration loading and validation.

use std::path::Path;
use std::time::Duration;

use figment::Jail;

use crate::config::{CrawlerConfig, VisitedSetKind, DEFAULT_BASE_URL, DEFAULT_MAX_WORKERS};
use crate::error::Error;

#[test]
fn test_defaults() {
    let config = CrawlerConfig::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.max_workers, DEFAULT_MAX_WORKERS);
    assert!(!config.verbose);
    assert_eq!(config.visited_set, VisitedSetKind::Locked);
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_workers_rejected() {
    let config = CrawlerConfig::new().with_max_workers(0);
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn test_base_url_must_be_http() {
    let config = CrawlerConfig::new().with_base_url("ftp://example.org/neighbors/");
    assert!(matches!(
        config.validate(),
        Err(Error::InvalidBaseUrl { .. })
    ));

    let config = CrawlerConfig::new().with_base_url("not a url");
    assert!(matches!(
        config.validate(),
        Err(Error::InvalidBaseUrl { .. })
    ));
}

#[test]
fn test_request_timeout_builder() {
    let config = CrawlerConfig::new().with_request_timeout(Duration::from_secs(2));
    assert_eq!(config.request_timeout_ms, 2_000);
    assert_eq!(config.request_timeout(), Duration::from_secs(2));
}

#[test]
fn test_missing_config_file() {
    let err = CrawlerConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
    assert!(err.to_string().contains("config file not found"));
}

#[test]
fn test_load_layers_file_then_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "hopcrawl.toml",
            r#"
                base_url = "http://file.example/neighbors/"
                max_workers = 3
                verbose = true
                visited_set = "sharded"
            "#,
        )?;
        jail.set_env("HOPCRAWL_MAX_WORKERS", "5");

        let config = CrawlerConfig::load(Some(Path::new("hopcrawl.toml")))
            .map_err(|e| e.to_string())?;
        assert_eq!(config.base_url, "http://file.example/neighbors/");
        assert_eq!(config.max_workers, 5);
        assert!(config.verbose);
        assert_eq!(config.visited_set, VisitedSetKind::Sharded);
        Ok(())
    });
}

#[test]
fn test_env_overrides_are_restricted() {
    Jail::expect_with(|jail| {
        jail.set_env("HOPCRAWL_BASE_URL", "http://env.example/n/");
        jail.set_env("HOPCRAWL_VERBOSE", "true");
        jail.set_env("HOPCRAWL_USER_AGENT", "sneaky");

        let config = CrawlerConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.base_url, "http://env.example/n/");
        assert!(!config.verbose);
        assert_eq!(config.user_agent, crate::config::DEFAULT_USER_AGENT);
        Ok(())
    });
}

#[test]
fn test_invalid_value_in_file() {
    Jail::expect_with(|jail| {
        jail.create_file("hopcrawl.toml", "max_workers = 0")?;
        let result = CrawlerConfig::load(Some(Path::new("hopcrawl.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
        Ok(())
    });
}
