use std::str::FromStr;
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Install the global fmt subscriber. Unknown levels fall back to `info`;
/// later calls are ignored.
pub fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(false)
                .init();
        });
    }
}
