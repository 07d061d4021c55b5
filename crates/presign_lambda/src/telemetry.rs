use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    /// JSON unless `text` is asked for, so CloudWatch gets structured lines
    /// by default.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("text") | Some("pretty") => Self::Text,
            _ => Self::Json,
        }
    }
}

pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).try_init(),
    }
}
