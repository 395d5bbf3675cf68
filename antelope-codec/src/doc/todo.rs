//! # To-Do list
//!
//! Items needing to be completed before a first release:
//!
//! - the protobuf bridge (`protobuf_types`) currently only round-trips the
//!   descriptor-set bytes; wiring it up to an external descriptor-pool
//!   library is out of scope for this crate (see top-level docs, §1).
//! - `float128` arithmetic requires a nightly compiler; the stable fallback
//!   only supports the wire and JSON representations, not arithmetic.
//! - `ABIProvider::get_abi_definition("signing_request")` is not wired up;
//!   it needs an `OverrideProvider` once the signing-request ABI lives in
//!   its own crate.
