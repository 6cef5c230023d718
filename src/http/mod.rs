//! Backend transport: request helpers, results and session handling

mod client;
mod result;
mod session;

pub use client::ApiClient;
pub use result::{RequestOptions, RequestResult};
pub use session::Session;
