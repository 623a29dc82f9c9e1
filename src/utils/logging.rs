use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global subscriber. `verbosity` comes from repeated `-v`
/// flags; `RUST_LOG` still wins when set.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => crate::utils::consts::LOG_LEVEL,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap();

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(std::io::stdout)
        .init();
}
