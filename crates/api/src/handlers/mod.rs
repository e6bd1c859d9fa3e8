pub mod parties;
pub mod slots;
