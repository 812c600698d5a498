//! Business logic services

pub mod geo;
pub mod itinerary;
pub mod planner;
pub mod routing;
pub mod travel_time;
