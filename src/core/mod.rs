// src/core/mod.rs

pub mod html;
pub mod net;
pub mod sanitize;
pub mod tidy;

pub use net::{Fetch, Session};
pub use tidy::tidy;
