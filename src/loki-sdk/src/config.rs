use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the Loki server (or a gateway in front of it)
    pub url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:3100"),
        }
    }
}

impl ClientConfig {
    /// Load from `loki.toml` in the working directory, overridden by
    /// `LOKI__*` environment variables.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from_path("loki.toml")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let config = Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("LOKI__").split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_configless_operation() {
        Jail::expect_with(|_jail| {
            let config = ClientConfig::load().map_err(|e| *e)?;
            assert_eq!(config.url, "http://localhost:3100");
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"url = "http://loki.internal:3100""#)?;

            let config = ClientConfig::load_from_path("custom.toml").map_err(|e| *e)?;
            assert_eq!(config.url, "http://loki.internal:3100");
            Ok(())
        });
    }

    #[test]
    fn test_env_var_override() {
        Jail::expect_with(|jail| {
            jail.create_file("loki.toml", r#"url = "http://from-file:3100""#)?;
            jail.set_env("LOKI__URL", "http://from-env:3100");

            let config = ClientConfig::load().map_err(|e| *e)?;
            assert_eq!(config.url, "http://from-env:3100");
            Ok(())
        });
    }
}
