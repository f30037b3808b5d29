pub mod assemble;
pub mod flatten;
pub mod grouping;
pub mod pipeline;
pub mod sorting;
pub mod visitor;

pub use assemble::*;
pub use flatten::*;
pub use grouping::*;
pub use pipeline::*;
pub use sorting::*;
pub use visitor::*;
