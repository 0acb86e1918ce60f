mod log;
mod subscriber;
mod throw;
mod tracer;
mod visitor;

pub use log::*;
pub use subscriber::*;
#[allow(unused_imports)]
pub use throw::*;
pub use tracer::*;
pub use tracing;
