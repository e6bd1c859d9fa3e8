pub mod requests;
pub mod slot;
