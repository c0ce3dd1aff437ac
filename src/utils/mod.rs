pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "expense_core=info";

/// Installs the global tracing subscriber; `RUST_LOG` overrides the default level.
///
/// Returns `true` only for the call that performed the setup.
pub fn init_tracing() -> bool {
    let mut first = false;
    TRACING_INIT.call_once(|| {
        first = true;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // A host may already have installed its own subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
    first
}
