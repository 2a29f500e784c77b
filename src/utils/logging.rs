use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default level for the `--debug` / `--quiet` flags
pub fn level_for(debug: bool, quiet: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger; `RUST_LOG` overrides the flag-derived level
pub fn init_logging(debug: bool, quiet: bool) {
    let level = level_for(debug, quiet);
    Builder::from_env(Env::default().default_filter_or(level.as_str().to_lowercase()))
        .format_timestamp(None)
        .format_target(debug)
        .init();
    if debug {
        log::debug!("Debug mode enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_wins_over_quiet() {
        assert_eq!(level_for(true, true), LevelFilter::Debug);
        assert_eq!(level_for(false, true), LevelFilter::Warn);
        assert_eq!(level_for(false, false), LevelFilter::Info);
    }
}
