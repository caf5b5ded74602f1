//! Delivery allocation for a multi-depot truck fleet over a weighted city
//! graph.
//!
//! Deliveries are placed greedily in input order: each one goes to the
//! qualifying vehicle (any center) whose re-planned route is shortest, subject
//! to capacity, operating hours and the deadlines of everything on board.

pub mod io;
pub mod problem;
pub mod routing;
pub mod utils;

pub use citygraph;
