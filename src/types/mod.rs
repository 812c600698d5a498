//! Type definitions

pub mod day;
pub mod messages;
pub mod place;
pub mod schedule;
pub mod travel;
pub mod trip;

pub use day::*;
pub use messages::*;
pub use place::*;
pub use schedule::*;
pub use travel::*;
pub use trip::*;
