use std::io::Write as _;
use std::sync::OnceLock;

static LOG_FILTER: OnceLock<env_filter::Filter> = OnceLock::new();

/// Install a minimal stderr logger, for tests and small binaries.
///
/// `filter` uses the `env_logger` syntax (e.g. `"debug"` or
/// `"pistonite_cobalt=trace"`). If the `RUST_LOG` environment variable is set
/// and non-empty, it takes precedence over `filter`.
///
/// Only the first call has any effect; later calls (and calls after
/// another logger was installed) are ignored.
pub fn log_init(filter: &str) {
    let spec = match crate::env_var("RUST_LOG") {
        Ok(value) if !value.is_empty() => value,
        _ => filter.to_string(),
    };
    let filter = env_filter::Builder::new().parse(&spec).build();
    let max_level = filter.filter();
    if LOG_FILTER.set(filter).is_err() {
        return;
    }

    struct LogImpl;
    impl log::Log for LogImpl {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            match LOG_FILTER.get() {
                Some(filter) => filter.enabled(metadata),
                None => false,
            }
        }

        fn log(&self, record: &log::Record) {
            let Some(filter) = LOG_FILTER.get() else {
                return;
            };
            if !filter.matches(record) {
                return;
            }
            let level = match record.level() {
                log::Level::Error => "E",
                log::Level::Warn => "W",
                log::Level::Info => "I",
                log::Level::Debug => "D",
                log::Level::Trace => "T",
            };
            // a closed stderr is not worth failing over
            let _ = writeln!(std::io::stderr().lock(), "[{level}] {}", record.args());
        }

        fn flush(&self) {}
    }

    if log::set_logger(&LogImpl).is_ok() {
        log::set_max_level(max_level);
    }
}
