//! Purpose: Library crate behind the `init6` CLI: decodes the Validity90 init6 record.
//! Exports: `api` (stable surface) and `core` (cursor, schema, decoder, errors).
//! Role: Pure decoding over in-memory buffers; loading and rendering live at the edges.
//! Invariants: Decoding never performs I/O and never returns a partial record.
//! Invariants: Opaque spans (digests, encrypted data) are carried verbatim, never interpreted.
pub mod api;
pub mod core;
