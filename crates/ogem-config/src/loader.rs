use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Environment placeholders are expanded before the TOML is parsed and the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, the TOML is malformed, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Load configuration if a path is given, defaults otherwise
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Config::load`]
    pub fn load_optional(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a duration is malformed or the delay range is empty
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pricing.timeout()?;
        self.pricing.provider_delay()?;

        let (min, max) = self.pricing.request_delay()?;
        if min > max {
            anyhow::bail!("pricing.request_delay_min must not exceed pricing.request_delay_max");
        }

        if self.log.level.trim().is_empty() {
            anyhow::bail!("log.level must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use indoc::indoc;

    use crate::{Config, LogFormat};

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Text);
        assert_eq!(config.pricing.timeout().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn full_file_parses() {
        let config = Config::from_toml(indoc! {r#"
            [log]
            level = "ogem_pricing=debug"
            format = "json"

            [pricing]
            timeout = "10s"
            request_delay_min = "0s"
            request_delay_max = "500ms"
            provider_delay = "1s"
            user_agent = "pricing-bot/1.0"

            [pricing.browser]
            enabled = false
            executable = "/opt/chrome/chrome"
        "#})
        .unwrap();

        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(
            config.pricing.request_delay().unwrap(),
            (Duration::ZERO, Duration::from_millis(500))
        );
        assert_eq!(config.pricing.user_agent.as_deref(), Some("pricing-bot/1.0"));
        assert!(!config.pricing.browser.enabled);
        assert_eq!(
            config.pricing.browser.executable.as_deref(),
            Some(std::path::Path::new("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn environment_values_are_expanded() {
        temp_env::with_var("OGEM_TEST_TIMEOUT", Some("45s"), || {
            let config = Config::from_toml(indoc! {r#"
                [pricing]
                timeout = "{{ env.OGEM_TEST_TIMEOUT }}"
            "#})
            .unwrap();

            assert_eq!(config.pricing.timeout().unwrap(), Duration::from_secs(45));
        });
    }

    #[test]
    fn inverted_delay_range_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [pricing]
            request_delay_min = "5s"
            request_delay_max = "1s"
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("request_delay_min"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml("[pricing]\nretries = 3\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ogem.toml");
        std::fs::write(&path, "[log]\nlevel = \"warn\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        let config = Config::load_optional(None).unwrap();
        assert!(config.pricing.browser.enabled);
    }
}
