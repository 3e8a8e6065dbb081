mod config;
pub mod stack;
pub mod tracing;
pub mod ws_source;

pub use config::{free_port, test_config};
pub use stack::TestStack;
pub use tracing::{CapturedEvent, captured_events, init_test_tracing};
pub use ws_source::start_ws_source;
