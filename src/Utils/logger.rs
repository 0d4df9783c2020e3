use log::LevelFilter;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};

/// Sets up terminal logging at `level`. Falls back to a plain stdout logger when no terminal
/// is attached; a logger installed earlier (e.g. by a test harness) is kept.
pub fn init_logger(level: LevelFilter) {
    let term = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    if term.is_err() && SimpleLogger::init(level, Config::default()).is_err() {
        log::debug!("logger already initialized");
    }
}

/// `Debug` when `verbose`, `Info` otherwise
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
