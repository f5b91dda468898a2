pub mod consortium;
pub mod roster;
