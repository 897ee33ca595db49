mod agent;
mod error;
mod media;
mod session;

pub use agent::*;
pub use error::*;
pub use media::*;
pub use session::*;
