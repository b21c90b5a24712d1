mod orchestrator;
mod session;
mod session_config;
mod shutdown;

pub use orchestrator::*;
pub use session::*;
pub use session_config::*;
pub use shutdown::*;
