pub mod party;
pub mod slot;

pub use party::PgPartyResolver;
pub use slot::PgSlotStore;
