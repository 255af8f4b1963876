pub mod store;
pub mod usecase;
