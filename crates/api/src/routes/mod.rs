pub mod health;
pub mod parties;
pub mod slots;
