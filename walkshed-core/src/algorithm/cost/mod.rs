mod cost_error;
mod cross_slope;
mod energy;

pub use cost_error::CostError;
pub use cross_slope::{generate_cross_slope, CROSS_SLOPE_LAYER};
pub use energy::{generate_energy_expenditure, ENERGY_LAYER};
