use std::net::SocketAddr;
use thiserror::Error;
use vitalhealth_pdf::RenderConfig;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid socket address: {value}")]
    InvalidAddr { name: &'static str, value: String },

    #[error("{name} must be a whole number of seconds: {value}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Server settings read from the environment.
///
/// - `VITALHEALTH_ADDR`: listen address (default `0.0.0.0:3000`)
/// - `VITALHEALTH_DISTRIBUTOR`: default distributor line
/// - `VITALHEALTH_CONTACT`: default WhatsApp contact
/// - `VITALHEALTH_LOGO_TIMEOUT_SECS`: logo download timeout (default 8)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub render: RenderConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("VITALHEALTH_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = addr_value
            .parse()
            .map_err(|_| ConfigError::InvalidAddr {
                name: "VITALHEALTH_ADDR",
                value: addr_value.clone(),
            })?;

        let mut render = RenderConfig::default();
        if let Some(distributor) = lookup("VITALHEALTH_DISTRIBUTOR") {
            render.default_distributor = distributor;
        }
        if let Some(contact) = lookup("VITALHEALTH_CONTACT") {
            render.default_contact = contact;
        }
        if let Some(timeout) = lookup("VITALHEALTH_LOGO_TIMEOUT_SECS") {
            render.logo_timeout_secs =
                timeout.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                    name: "VITALHEALTH_LOGO_TIMEOUT_SECS",
                    value: timeout.clone(),
                })?;
        }

        Ok(Self { addr, render })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("VITALHEALTH_ADDR", "127.0.0.1:8080"),
            ("VITALHEALTH_DISTRIBUTOR", "Tienda Natural"),
            ("VITALHEALTH_CONTACT", "300 123 4567"),
            ("VITALHEALTH_LOGO_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.render.default_distributor, "Tienda Natural");
        assert_eq!(config.render.default_contact, "300 123 4567");
        assert_eq!(config.render.logo_timeout_secs, 3);
    }

    #[test]
    fn test_invalid_values() {
        let error = ServerConfig::from_lookup(lookup(&[("VITALHEALTH_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidAddr { .. }));

        let error =
            ServerConfig::from_lookup(lookup(&[("VITALHEALTH_LOGO_TIMEOUT_SECS", "soon")]))
                .unwrap_err();
        assert_eq!(
            error.to_string(),
            "VITALHEALTH_LOGO_TIMEOUT_SECS must be a whole number of seconds: soon"
        );
    }
}
