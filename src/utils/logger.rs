use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log target used for every message emitted by the extension pipeline.
pub const LOG_TARGET: &str = "community_comments";

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("paper_comments=debug,community_comments=debug,info")
        } else {
            EnvFilter::new("paper_comments=info,community_comments=info,warn")
        }
    })
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON output for hosts that forward logs to a structured collector.
/// Returns `false` when a global subscriber was already installed.
pub fn init_json_logger() -> bool {
    tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_logger_installs_once() {
        let _ = init_json_logger();
        assert!(!init_json_logger());
        tracing::info!(target: LOG_TARGET, "logger initialised");
    }
}
