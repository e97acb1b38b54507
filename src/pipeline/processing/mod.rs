// Pipeline processing: row transformation and manual corrections

pub mod corrections;
pub mod schema;
pub mod transform;

pub use corrections::{apply_corrections, Correction, CORRECTIONS};
pub use schema::{NumericPolicy, Schema};
pub use transform::{RowOutcome, RowTransformer};
