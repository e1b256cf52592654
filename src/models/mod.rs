pub mod api;
pub mod attraction;
pub mod date_range;
pub mod trip;

pub use attraction::{Attraction, Coordinates};
pub use date_range::DateRange;
pub use trip::{ClockTime, DayPlan, PlanSource, TripPlan};
