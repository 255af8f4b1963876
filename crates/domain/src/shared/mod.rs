pub mod entity;
pub mod attributes;
