use std::env;

/// Process configuration, read once at startup.
///
/// `DATABASE_URL` and `SECRET_KEY` have no defaults and abort startup when
/// missing. The rest fall back to development-friendly values.
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub jwt_algorithm: String,
    pub access_token_expire_minutes: i64,
    pub server_port: u16,
    pub server_host: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            secret_key: env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
            jwt_algorithm: var_or("JWT_ALGORITHM", "HS256"),
            access_token_expire_minutes: var_or("ACCESS_TOKEN_EXPIRE_MINUTES", "10080") // 7 days
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number"),
            server_port: var_or("SERVER_PORT", "8080")
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: var_or("SERVER_HOST", "127.0.0.1"),
        }
    }

    /// Address the server announces in its startup log line.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
