#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
