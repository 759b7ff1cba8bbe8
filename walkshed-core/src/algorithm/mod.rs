pub mod cost;
pub mod generator;
pub mod search;
pub mod view;
