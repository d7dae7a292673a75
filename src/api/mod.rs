pub mod admin;
pub mod auth;
pub mod client;
pub mod envelope;

pub use client::ApiClient;
pub use envelope::ResponseEnvelope;
