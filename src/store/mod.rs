pub mod toggle;
pub mod workspace;

pub use toggle::*;
pub use workspace::*;
