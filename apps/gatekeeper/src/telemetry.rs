use gatekeeper::config::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,gatekeeper=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .json()
                    .with_current_span(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).pretty())
            .init(),
    }
}
