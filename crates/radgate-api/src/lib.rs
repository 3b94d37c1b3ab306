//! Async HTTP client for the radgate appliance control-plane API.
//!
//! The device exposes one endpoint pair per configurable section:
//! `GET <base>/<section>/info` and `POST <base>/<section>/apply`.
//! This crate handles transport only -- payload normalization and typed
//! extraction live in `radgate-core`.

pub mod client;
pub mod error;

pub use client::{ClientOptions, DeviceClient, RawBody};
pub use error::Error;
