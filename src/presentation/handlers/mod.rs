mod health;
mod stt;

pub use health::health_handler;
pub use stt::{stt_handler, ErrorResponse, SttResponse};
