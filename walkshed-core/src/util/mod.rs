mod cancellation;
pub mod priority_queue;

pub use cancellation::CancellationToken;
