use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub bind_addr: SocketAddr,
    pub dataset_path: PathBuf,
    pub palette_path: Option<PathBuf>,
    /// Default trend bucket width, e.g. `7D`.
    pub rolling_period: String,
    /// Ranked posts returned per platform; `0` means unlimited.
    pub rank_limit: usize,
}

impl AppConfig {
    /// The rank limit as an optional cap.
    #[must_use]
    pub fn rank_cap(&self) -> Option<usize> {
        (self.rank_limit > 0).then_some(self.rank_limit)
    }
}
