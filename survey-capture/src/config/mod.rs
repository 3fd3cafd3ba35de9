//! Configuration du client

use std::time::Duration;

use geocapture::DEFAULT_SRID;

/// URL par défaut du record store
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Configuration du client du record store
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// URL de base, sans `/records`
    pub api_url: String,
    /// Délai maximum d'une requête
    pub timeout: Duration,
    /// SRID proposé par défaut à la saisie
    pub default_srid: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(30),
            default_srid: DEFAULT_SRID,
        }
    }
}

impl ClientConfig {
    /// Charge la configuration depuis les variables d'environnement
    ///
    /// - `SURVEY_API_URL`
    /// - `SURVEY_TIMEOUT_SECS`
    /// - `SURVEY_DEFAULT_SRID`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Variante injectable de `from_env` ; les valeurs invalides sont ignorées
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: var("SURVEY_API_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.api_url),
            timeout: var("SURVEY_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            default_srid: var("SURVEY_DEFAULT_SRID")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_srid),
        }
    }

    /// Applique les surcharges de la ligne de commande
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}
