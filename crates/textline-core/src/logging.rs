use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize logging/tracing for the service.
///
/// `RUST_LOG` overrides the default filter. With `json = true` every event is
/// emitted as one JSON object per line.
pub fn init(service_name: &str, json: bool) -> Result<()> {
    // Default: info everywhere. Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,{service_name}=info,textline_core=info,textline_http=info,\
             textline_openai=info,textline_twilio=info,tower_http=info"
        ))
    });

    let builder = fmt().with_env_filter(filter).with_target(false);

    let res = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(true).try_init()
    };

    res.map_err(|e| Error::Config(format!("failed to install tracing subscriber: {e}")))
}
