pub mod entity_ops;
pub mod search;
