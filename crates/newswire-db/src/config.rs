use newswire_core::AppError;
use url::Url;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_NAME: &str = "news";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Read configuration from environment variables.
    ///
    /// - `DATABASE_URL` (optional, wins when set)
    /// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` (used to
    ///   assemble the URL otherwise)
    /// - `DATABASE_MAX_CONNECTIONS` (optional, defaults to 5)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = match var("DATABASE_URL") {
            Some(url) => url,
            None => assemble_url(&var)?,
        };

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => {
                let parsed: u32 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid DATABASE_MAX_CONNECTIONS '{raw}': must be a positive integer"
                    ))
                })?;
                if parsed == 0 {
                    return Err(AppError::ConfigError(
                        "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
                    ));
                }
                parsed
            }
        };

        Ok(Self {
            url,
            max_connections,
        })
    }
}

fn assemble_url(var: &dyn Fn(&str) -> Option<String>) -> Result<String, AppError> {
    let host = var("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match var("DB_PORT") {
        None => DEFAULT_PORT,
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("Invalid DB_PORT '{raw}': must be a port number"))
        })?,
    };
    let user = var("DB_USER").unwrap_or_else(|| DEFAULT_USER.to_string());
    let name = var("DB_NAME").unwrap_or_else(|| DEFAULT_NAME.to_string());

    let invalid = |what: &str| AppError::ConfigError(format!("Invalid {what} for database URL"));

    let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("base"))?;
    url.set_host(Some(&host)).map_err(|_| invalid("DB_HOST"))?;
    url.set_port(Some(port)).map_err(|_| invalid("DB_PORT"))?;
    url.set_username(&user).map_err(|_| invalid("DB_USER"))?;
    if let Some(password) = var("DB_PASSWORD") {
        url.set_password(Some(&password))
            .map_err(|_| invalid("DB_PASSWORD"))?;
    }
    url.set_path(&format!("/{name}"));

    Ok(url.to_string())
}
