#![warn(clippy::pedantic)]
// Noisy doc/signature lints; would require annotating every pub function
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference: keeping format!("{}", x) over format!("{x}") for complex exprs
#![allow(clippy::uninlined_format_args)]
// Counts and prices come off the wire as i64/u64/f64
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
// Module structure: api::ApiClient, session::SessionStore and friends
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod feed;
pub mod notifier;
pub mod session;
pub(crate) mod utils;

/// Re-exports for fuzz targets. Not part of the public API.
#[doc(hidden)]
pub mod fuzz_api {
    pub use crate::api::parse_timestamp;

    /// Decode a product list body the way the client does.
    pub fn decode_products(body: &str) -> Option<Vec<crate::api::Product>> {
        serde_json::from_str::<crate::api::types::ListEnvelope<crate::api::Product>>(body)
            .ok()
            .map(crate::api::types::ListEnvelope::into_vec)
    }

    /// Decode a message list body the way the client does.
    pub fn decode_messages(body: &str) -> Option<Vec<crate::api::Message>> {
        serde_json::from_str::<crate::api::types::ListEnvelope<crate::api::Message>>(body)
            .ok()
            .map(crate::api::types::ListEnvelope::into_vec)
    }
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
