pub mod check_upkeep;
pub mod enter;
pub mod initialize;
pub mod perform_upkeep;
pub mod settle;

pub use check_upkeep::*;
pub use enter::*;
pub use initialize::*;
pub use perform_upkeep::*;
pub use settle::*;
