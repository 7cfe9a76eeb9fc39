use std::env;

/// Connection string used when `MONGO_URI` is unset.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/quicktask";

/// Database used when the connection string carries no database segment.
pub const DEFAULT_DATABASE: &str = "quicktask";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub database_name: String,
    pub mongo_max_pool_size: u32,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGO_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.to_string());
        let database_name = database_name_from_uri(&mongo_uri);

        Self {
            mongo_uri,
            database_name,
            mongo_max_pool_size: lookup("MONGO_MAX_POOL_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            host: lookup("ANALYTICS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("ANALYTICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8001),
        }
    }
}

/// Trailing path segment of a Mongo connection string, query string stripped.
///
/// `mongodb://host:27017/quicktask?retryWrites=true` yields `quicktask`.
/// Falls back to [`DEFAULT_DATABASE`] when there is no segment after the hosts.
pub fn database_name_from_uri(uri: &str) -> String {
    let without_query = uri.split('?').next().unwrap_or_default();
    let without_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);

    match without_scheme.split_once('/') {
        Some((_, path)) => {
            let name = path.rsplit('/').next().unwrap_or_default();
            if name.is_empty() {
                DEFAULT_DATABASE.to_string()
            } else {
                name.to_string()
            }
        }
        None => DEFAULT_DATABASE.to_string(),
    }
}
