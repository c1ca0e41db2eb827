use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `RUST_LOG` wins over the configured level.
fn filter(config: &LoggingConfig) -> Result<EnvFilter, BoxError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level)?),
    }
}

/// Install the global tracing subscriber.
pub fn init(config: &LoggingConfig) -> Result<(), BoxError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_target(true);

    match config.format.as_str() {
        "json" => builder.json().try_init()?,
        "pretty" => builder.pretty().try_init()?,
        other => return Err(format!("unknown log format: {}", other).into()),
    }
    Ok(())
}
