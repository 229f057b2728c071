pub mod context;
pub mod error;

pub use context::{AppContext, ServiceIdentity};
pub use error::{ProbeError, Result};
