//! Cart engine: validation, batch processing, merge preview, and the
//! operation surface over a store.

pub mod batch;
pub mod preview;
pub mod service;
pub mod validate;
