mod endpoint;
mod presence_directory;

pub use endpoint::*;
pub use presence_directory::*;
