use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured,
/// with `level` added on top.
pub fn init_logging(level: &str) -> Result<()> {
    let level = level.parse::<Level>()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .init();
    Ok(())
}
