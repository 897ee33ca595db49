mod config;
mod presence;
mod room;
mod signaling;

pub use config::RelayConfig;
pub use presence::*;
pub use room::*;
pub use signaling::*;
