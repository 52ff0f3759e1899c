pub mod patient;
pub mod roster;
