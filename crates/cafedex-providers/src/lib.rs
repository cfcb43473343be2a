//! Cafedex Providers - HTTP adapters behind the core port traits
//!
//! One adapter per external provider (place search, structured
//! generation, embeddings), plus the shared bounded-retry policy every
//! adapter routes its calls through.

pub mod anthropic;
pub mod apify;
pub mod openai;
pub mod retry;

pub use retry::RetryPolicy;
