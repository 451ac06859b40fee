pub mod axum_http;
pub mod in_memory;
pub mod postgres;
