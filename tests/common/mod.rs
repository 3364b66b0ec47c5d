pub mod fixtures;
pub mod transport;

pub use fixtures::*;
pub use transport::*;
