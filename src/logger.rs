//! The logging sink the compositor reports recoverable problems to.
//!
//! Callers inject a [`ShareLogger`]; the default [`LogLogger`] forwards to
//! the `log` facade so the events land wherever the host application's
//! logger sends them (`env_logger` in the CLI).

/// Key/value pairs attached to a log event.
pub type LogContext<'a> = &'a [(&'a str, String)];

pub trait ShareLogger {
    fn warning(&self, message: &str, context: LogContext<'_>);

    fn error(&self, message: &str, context: LogContext<'_>);
}

/// Forwards events to `log::warn!` / `log::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl ShareLogger for LogLogger {
    fn warning(&self, message: &str, context: LogContext<'_>) {
        log::warn!("{message}{}", format_context(context));
    }

    fn error(&self, message: &str, context: LogContext<'_>) {
        log::error!("{message}{}", format_context(context));
    }
}

/// Render context as ` key=value key=value`, or an empty string.
pub fn format_context(context: LogContext<'_>) -> String {
    context
        .iter()
        .map(|(key, value)| format!(" {key}={value}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_renders_as_key_value_pairs() {
        let ctx = [("index", "1".to_string()), ("reason", "no bytes".to_string())];
        assert_eq!(format_context(&ctx), " index=1 reason=no bytes");
    }

    #[test]
    fn empty_context_renders_nothing() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn log_logger_accepts_events() {
        // No logger installed: the calls must simply not panic
        LogLogger.warning("photo skipped", &[("index", "0".to_string())]);
        LogLogger.error("encode failed", &[]);
    }
}
