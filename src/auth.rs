//! Session token models: redacted secrets, decoded expiry, and lifecycle status.

pub mod token;

pub use token::{claims::*, secret::*, *};
