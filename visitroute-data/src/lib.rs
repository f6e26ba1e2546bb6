//! Data access adapters for the visitroute engine.
//!
//! Responsibilities:
//! - Provide live cost sources backed by external services.
//! - Encapsulate wire formats so domain code never sees them.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `visitroute-core`).
//! - Never return partially resolved matrices; a failure is a whole-source
//!   failure and callers fall back.
//!
//! Invariants:
//! - No global mutable state.
//! - Credentials never appear in logs or error messages.

pub mod routing;
