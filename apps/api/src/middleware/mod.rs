//! Middleware and extractors for the Muselink API

pub mod api_key;

pub use api_key::{ApiKeySettings, RequireApiKey};
