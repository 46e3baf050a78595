pub mod lineup;
pub mod optimize_request;
pub mod projections_request;

pub use lineup::Lineup;
pub use optimize_request::{MAX_WEEK, OptimizeRequest, RequestValidationError};
pub use projections_request::ProjectionsRequest;
