pub mod config;
pub mod entity;
pub mod settings;

pub use config::*;
pub use entity::*;
pub use settings::*;
