//! Domain model: the cart aggregate, operation payloads, and events.

pub mod cart;
pub mod events;
pub mod ops;
