//! # ミドルウェア
//!
//! History API 用のミドルウェアを提供する。

pub mod cache_control;
pub mod request_id;

pub use cache_control::no_cache;
pub use request_id::{current_request_id, store_request_id};
