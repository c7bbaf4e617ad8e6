pub mod auth;
pub mod filter;
pub mod submission;
pub mod validation;

pub use auth::{Session, SessionKeys};
pub use filter::{filter_events, FilterCriteria, FilterQuery};
pub use submission::{assemble, SubmissionContext};
pub use validation::{validate, ValidationError};
