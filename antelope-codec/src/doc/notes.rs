//! # Notes
//!
//! Random notes and links that don't fit anywhere else:
//!
//! - the ABI suffix grammar (`T?`, `T[]`, `T[N]`, `T$`) is parsed
//!   right-to-left; see [`crate::abi::TypeName`].
//! - `i64`/`u64`/`i128`/`u128` are rendered as quoted JSON strings to avoid
//!   precision loss when round-tripping through `f64`-backed JSON parsers.
//! - the reorderable JSON-to-binary path exists because wallets and other
//!   signing tools don't always preserve a contract's declared field order
//!   when building the arguments object by hand.
//! - useful references:
//!   - <https://docs.eosnetwork.com/manuals/cdt/latest/best-practices/abi/understanding-abi-files/>
//!   - <https://github.com/AntelopeIO/spring/blob/main/libraries/chain/abi_serializer.cpp>
