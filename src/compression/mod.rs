//! The compression module holds both directions of the codec.
//!
//! Deflation happens in the following steps:
//! - Run collection: one pass over the input recording every span of more
//!   than three identical bytes.
//! - Efficiency estimation: for each of the four node formats, compute the
//!   exact bytes the encoding would save without building any nodes.
//! - Format selection: keep the format with the greatest positive saving,
//!   or refuse the input when no format saves anything.
//! - Table building: materialize the node records for every run, in
//!   parallel over contiguous blocks of the run list.
//! - Writing: emplace the header and table into an output sized ahead of
//!   time, then interleave the verbatim bytes the node stream implies.
//!
//! Inflation follows the inverse: validate the header, fold the node table
//! back into logical runs, then alternate copying verbatim bytes and
//! filling runs until the output reaches exactly the declared length.

pub mod deflate;
pub mod efficiency;
pub mod inflate;
pub mod runs;
pub mod table;
