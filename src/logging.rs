// src/logging.rs
// =============================================================================
// Sets up the `log` macros (info!, warn!, debug!) used across the program.
//
// Logs go to stderr with a timestamp, so the summary and --json output on
// stdout stay clean. The level is "info" by default, "debug" with -v, and
// RUST_LOG overrides both (e.g. RUST_LOG=crawler_collage=trace).
// =============================================================================

pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}
