//! Outbound adapters implementing the domain's driven ports.
//!
//! Real persistence belongs to an external collaborator; the in-memory
//! adapters here keep every port honest (row-granular concurrency,
//! idempotent revocation, case-insensitive email uniqueness) and double
//! as test fixtures and default wiring for the binary.

pub mod memory;
