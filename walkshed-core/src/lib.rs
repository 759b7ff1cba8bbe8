#![doc = include_str!("doc.md")]

pub mod algorithm;
pub mod model;
pub mod util;

// mesh and graph fixtures shared between unit and integration tests
pub mod testing;
