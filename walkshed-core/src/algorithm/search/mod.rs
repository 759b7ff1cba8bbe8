mod dijkstra;
mod path;
mod search_error;

pub use dijkstra::{all_to_all, shortest_path, shortest_path_multi, shortest_path_multi_cancellable};
pub use path::{Path, PathMember};
pub use search_error::SearchError;
