//! # Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`crate::types`] — the scalar codecs: fixed-width integers, `name`,
//!   varint/zigzag, fixed-byte digests, crypto keys, `symbol`/`asset`,
//!   time types, `string`/`bytes`.
//! - [`crate::abi`] — the validated type graph ([`crate::ABI`], built from
//!   an [`crate::ABIDefinition`]) plus the recursive composite serializers
//!   that drive `bin_to_json`/`json_to_bin`/`json_to_bin_reorderable`.
//! - [`crate::kv`] — the order-preserving key codec used by KV tables,
//!   layered on top of the scalar codecs.
//! - [`crate::chain`] — native Rust types for chain objects (actions,
//!   transactions, traces) built with `#[derive(ABISerializable)]` on top
//!   of [`crate::abiserializable`].
//!
//! Everything below the ABI layer is stateless: a call takes an input
//! cursor and an output sink and returns a `Result`. The only long-lived,
//! shared state is the immutable [`crate::ABI`] itself.
