/*
 * Library root. The engine and its collaborators live in `core`; this file only
 * adds process-wide logging setup shared by the binary and the tests.
 */
pub mod core;

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::sync::Once;

pub const APP_NAME: &str = "search_scope";

static LOGGING_INIT: Once = Once::new();

/*
 * Installs a stderr terminal logger at `level`. Only the first call in a process
 * takes effect, so tests can call this freely.
 */
pub fn initialize_logging_with_level(level: LevelFilter) {
    LOGGING_INIT.call_once(|| {
        let config = ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .set_thread_level(LevelFilter::Debug)
            .build();
        if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
            eprintln!("Failed to initialize logger: {e}");
        }
    });
}

pub fn initialize_logging() {
    initialize_logging_with_level(LevelFilter::Debug);
}
