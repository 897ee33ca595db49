mod agent_command;
mod agent_config;
mod agent_handle;
mod call_agent;
mod call_event;
mod mesh_room;

pub use agent_command::*;
pub use agent_config::*;
pub use agent_handle::*;
pub use call_agent::*;
pub use call_event::*;
pub use mesh_room::*;
