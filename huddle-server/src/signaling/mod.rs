mod server;
mod signaling_relay;
mod ws_handler;

pub use server::*;
pub use signaling_relay::*;
pub use ws_handler::*;
