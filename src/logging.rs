use std::io;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Install the global tracing subscriber. `RUST_LOG` wins when set, otherwise
/// everything at `info`. Output goes to stdout so sidecar log collectors pick
/// it up next to the app's own output.
pub fn init(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    let builder = fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stdout);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    // No subscriber is listening yet when this fails, so stderr it is.
    if let Err(e) = installed {
        eprintln!("could not install log subscriber: {e}");
    }
}
