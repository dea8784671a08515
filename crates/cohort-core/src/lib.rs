pub mod schema;
pub mod status;

pub use schema::PREDICTION_COLUMN;
pub use status::{StudentStatus, label_codes};
