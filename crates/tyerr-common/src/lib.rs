pub mod error;
pub mod limits;
pub mod span;

pub use error::FatalError;
pub use span::{Position, Range};
