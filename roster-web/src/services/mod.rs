//! Clients for external services

pub mod gemini_client;
pub mod sheets_client;

pub use gemini_client::GeminiClient;
pub use sheets_client::SheetsClient;
