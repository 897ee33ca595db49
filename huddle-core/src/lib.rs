pub mod error;
pub mod model;

pub use error::SignalingError;
pub use model::*;
