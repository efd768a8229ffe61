//! The format module defines the on-disk shape of a deflated file.
//!
//! A deflated file is laid out as `header ‖ node table ‖ verbatim stream`:
//! - header: the fixed 16-byte record identifying the stream and the node
//!   format used by the table.
//! - node: the four packed record layouts and the four roles (standard,
//!   skip, signal, long) a record can play.
//!
//! The verbatim stream needs no definition of its own: it is the input bytes
//! that lay outside runs, concatenated in input order, with positions
//! implied by the node stream.

pub mod header;
pub mod node;
