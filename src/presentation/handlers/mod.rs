mod caller;
mod delete;
mod draft;
mod dto;
mod error;
mod finalize;
mod health;
mod history;
mod job_status;
mod languages;
mod metadata;
mod upload_url;

pub use caller::{Caller, USER_ID_HEADER};
pub use delete::delete_job_handler;
pub use draft::draft_handler;
pub use dto::{JobStatusResponse, SegmentPayload};
pub use error::{ErrorResponse, error_response, pipeline_error_response, status_for};
pub use finalize::finalize_handler;
pub use health::health_handler;
pub use history::history_handler;
pub use job_status::job_status_handler;
pub use languages::languages_handler;
pub use metadata::metadata_handler;
pub use upload_url::upload_url_handler;
