pub mod billing;
pub mod proof;
