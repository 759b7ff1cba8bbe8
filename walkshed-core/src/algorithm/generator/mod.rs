mod generator;
mod generator_config;
mod generator_error;

pub use generator::generate_graph;
pub use generator_config::GeneratorConfig;
pub use generator_error::GeneratorError;
