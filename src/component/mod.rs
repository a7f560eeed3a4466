mod cost;
mod solution;

pub use cost::TourCost;
pub use solution::Solution;
