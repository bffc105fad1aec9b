//! 通用工具

pub mod fingerprint;

pub use fingerprint::{fingerprint, fingerprint_cat, fingerprint_str};
