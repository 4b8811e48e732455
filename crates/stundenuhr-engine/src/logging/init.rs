use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "stundenuhr_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// wgpu and naga are chatty at `info`; keep them at `warn` unless the
/// filter names them explicitly.
const QUIET_DEPENDENCIES: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// Subsequent calls are ignored. Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());
        match &filter {
            Some(filter) => {
                for dep in QUIET_DEPENDENCIES {
                    if !filter.contains(dep) {
                        builder.filter_module(dep, log::LevelFilter::Warn);
                    }
                }
                builder.parse_filters(filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
                for dep in QUIET_DEPENDENCIES {
                    builder.filter_module(dep, log::LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
