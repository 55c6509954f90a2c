use tracing_subscriber::{prelude::*, EnvFilter};

/// Log to stderr so command output on stdout stays clean.
/// `RUST_LOG` overrides the default `charades=info` filter.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "charades=debug" } else { "charades=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init: a second call (e.g. from tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
