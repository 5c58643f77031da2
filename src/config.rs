use crate::error::SlmError;
use crate::services::SignatureScheme;
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_TABLE: &str = "slm_transactions";

/// Storage variable name used by earlier deployments, read when
/// `REDIS_URL` is unset.
pub const LEGACY_STORE_VAR: &str = "BLUEDOGE_DYNDB_ADDRESS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Key-value store
    pub redis_url: String,
    pub table: String,

    // Marketplace notification settings
    pub marketplace_salt: SecretString,
    pub seller_key: SecretString,
    pub signature_scheme: SignatureScheme,
}

impl Config {
    pub fn from_env() -> Result<Self, SlmError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty and whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| {
                SlmError::Configuration(format!("Environment variable not found: {}", name))
            })
        };

        let environment = parse_environment(var("ENVIRONMENT").as_deref())?;

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| SlmError::Configuration(format!("Invalid PORT: {}", port)))?,
            None => 8080,
        };

        let signature_scheme = match var("SIGNATURE_SCHEME") {
            Some(scheme) => scheme.parse()?,
            None => SignatureScheme::LegacySha1,
        };

        let redis_url = match var("REDIS_URL").or_else(|| var(LEGACY_STORE_VAR)) {
            Some(url) => url,
            None => required("REDIS_URL")?,
        };

        let config = Self {
            environment,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            redis_url,
            table: var("STORE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            marketplace_salt: SecretString::new(required("SECONDLIFE_MARKETPLACE_HASH")?),
            seller_key: SecretString::new(required("SECONDLIFE_SELLER_KEY")?),
            signature_scheme,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SlmError> {
        const REDIS_SCHEMES: [&str; 3] = ["redis://", "rediss://", "redis+unix://"];
        if !REDIS_SCHEMES
            .iter()
            .any(|scheme| self.redis_url.starts_with(scheme))
        {
            return Err(SlmError::Configuration(
                "REDIS_URL must use the redis://, rediss:// or redis+unix:// scheme".to_string(),
            ));
        }

        if self.table.contains(':') {
            return Err(SlmError::Configuration(
                "STORE_TABLE must not contain ':'".to_string(),
            ));
        }

        if self.seller_key.expose_secret().contains(':') {
            return Err(SlmError::Configuration(
                "SECONDLIFE_SELLER_KEY must not contain ':'".to_string(),
            ));
        }

        tracing::info!(
            "Configuration validated for {:?} environment (signature scheme: {})",
            self.environment,
            self.signature_scheme
        );

        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_environment(value: Option<&str>) -> Result<Environment, SlmError> {
    let env = value.unwrap_or("development");

    match env.trim().to_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "staging" => Ok(Environment::Staging),
        "production" | "prod" => Ok(Environment::Production),
        _ => Err(SlmError::Configuration(format!(
            "Unknown environment: {}",
            env
        ))),
    }
}
