mod relay_config;
mod relay_connection;
mod signaling_output;
mod transport_event;

pub use relay_config::*;
pub use relay_connection::*;
pub use signaling_output::*;
pub use transport_event::*;
