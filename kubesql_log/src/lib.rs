use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Handle for swapping the active log filter at runtime.
pub type LogHandle = reload::Handle<EnvFilter, Registry>;

/// Install the global subscriber, writing to stderr.
/// `directive` – filter used when `RUST_LOG` is unset, `json` – emit JSON lines.
/// Returns a reload handle that can update the filter at runtime.
pub fn init(directive: &str, json: bool) -> Result<LogHandle> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => parse_filter(directive)?,
    };
    let (filter, handle) = reload::Layer::new(filter);

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(handle)
}

/// Replace the filter behind `handle` with `directive`.
pub fn set_level(handle: &LogHandle, directive: &str) -> Result<()> {
    let filter = parse_filter(directive)?;
    handle.reload(filter).context("reload log filter")
}

fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter '{directive}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse() {
        assert!(parse_filter("warn").is_ok());
        assert!(parse_filter("kubesql_parser=debug,warn").is_ok());
        assert!(parse_filter("kubesql=loud").is_err());
    }

    #[test]
    fn init_once_then_reload() {
        let handle = init("warn", false).unwrap();
        set_level(&handle, "debug").unwrap();
        assert!(set_level(&handle, "kubesql=loud").is_err());
        assert!(init("warn", false).is_err());
    }
}
