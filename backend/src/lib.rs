//! Backend library modules.
//!
//! The crate is laid out hexagonally: [`domain`] holds the
//! transport-agnostic core (authentication, authorization, validation,
//! the Outcome pipeline), [`inbound`] adapts HTTP requests onto the
//! domain, and [`outbound`] provides adapters for the driven ports.

pub mod domain;
pub mod inbound;
pub mod outbound;
