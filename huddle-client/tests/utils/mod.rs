
pub use mock_engine::*;
pub use test_network::*;
