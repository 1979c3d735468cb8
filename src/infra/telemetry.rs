use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// Install a global tracing subscriber using the provided logging settings.
///
/// `RUST_LOG` directives refine the configured base level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })?;

    info!(
        target = "postline::telemetry",
        level = %logging.level,
        format = format_label(logging.format),
        version = env!("CARGO_PKG_VERSION"),
        "logging initialised"
    );
    Ok(())
}

fn format_label(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Json => "json",
        LogFormat::Compact => "compact",
    }
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn format_labels_match_config_values() {
        assert_eq!(format_label(LogFormat::Json), "json");
        assert_eq!(format_label(LogFormat::Compact), "compact");
    }

    #[test]
    fn second_install_reports_a_telemetry_error() {
        let settings = LoggingSettings {
            level: LevelFilter::WARN,
            format: LogFormat::Compact,
        };
        let _ = init(&settings);
        assert!(matches!(init(&settings), Err(InfraError::Telemetry(_))));
    }
}
