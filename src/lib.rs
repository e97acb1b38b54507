pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{CapacityError, Result};
pub use pipeline::{Pipeline, RunSummary};
pub use types::{RegionId, RegionRecord};
