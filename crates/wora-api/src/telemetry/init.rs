use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "wora=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// Production emits one JSON object per event; other environments use the
/// compact console format. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(production: bool) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let result = if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(json = production, "Tracing initialized");
    Ok(())
}
