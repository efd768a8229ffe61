/*
Deflation is two passes. The first pass never touches the output: collect
the runs, estimate the four candidate formats, and pick the winner - at that
point the compressed size is already known exactly, because the saving is
the run bytes the table absorbs minus the table's own size:

    compressed = N - saving + header

The second pass materializes the node table into an output range of exactly
that size, then interleaves: walk the node stream, copying each record's gap
of verbatim bytes from the input and stepping the input cursor over the run
bytes the record absorbs. The run bytes are never written; the reader
regenerates them. At the end both cursors must land exactly on their range
ends, or the size prediction was wrong.
*/

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::compression::efficiency::select_format;
use crate::compression::runs::{collect_runs, Run};
use crate::compression::table::{build_table, write_table};
use crate::error::RleError;
use crate::format::header::{Header, HEADER_SIZE};
use crate::format::node::{NodeField, NodeFormat, PackedNode};
use crate::tools::mapped;

/// Deflate a byte slice into a freshly allocated buffer.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>, RleError> {
    let runs = collect_runs(data);
    let (format, saving) = select_format(&runs).ok_or(RleError::Inefficient)?;
    let mut out = vec![0u8; compressed_length(data.len(), saving)];
    deflate_into(data, &runs, format, &mut out)?;
    Ok(out)
}

/// Deflate one file into another through memory-mapped views. The output
/// is created at its exact final length before a byte is written.
pub fn deflate_file(input: &Path, output: &Path) -> Result<(), RleError> {
    // An empty file has no runs (and cannot be mapped anyway).
    if fs::metadata(input)?.len() == 0 {
        return Err(RleError::Inefficient);
    }
    let in_view = mapped::view(input)?;

    let runs = collect_runs(&in_view);
    debug!("Collected {} runs from {} bytes.", runs.len(), in_view.len());
    let (format, saving) = select_format(&runs).ok_or(RleError::Inefficient)?;
    info!("Selected format {} saving {} bytes.", format, saving);

    let length = compressed_length(in_view.len(), saving);
    let mut out_view = mapped::view_mut(output, length as u64)?;
    deflate_into(&in_view, &runs, format, &mut out_view)?;
    out_view.flush()?;

    info!(
        "Deflated {} bytes into {} ({:.2}%).",
        in_view.len(),
        length,
        (length * 10_000 / in_view.len()) as f64 / 100.0
    );
    Ok(())
}

/// Exact output size for a given saving. The saving counts run bytes minus
/// table bytes, so `N - saving` is verbatim bytes plus table bytes already.
fn compressed_length(input_len: usize, saving: i64) -> usize {
    (input_len as i64 - saving) as usize + HEADER_SIZE
}

/// Fill a pre-sized output range with header, table and verbatim stream.
fn deflate_into(
    data: &[u8],
    runs: &[Run],
    format: NodeFormat,
    out: &mut [u8],
) -> Result<(), RleError> {
    match format {
        NodeFormat::P8L8 => emit::<u8, u8>(data, runs, format, out),
        NodeFormat::P8L16 => emit::<u8, u16>(data, runs, format, out),
        NodeFormat::P16L8 => emit::<u16, u8>(data, runs, format, out),
        NodeFormat::P16L16 => emit::<u16, u16>(data, runs, format, out),
    }
}

fn emit<P: NodeField, L: NodeField>(
    data: &[u8],
    runs: &[Run],
    format: NodeFormat,
    out: &mut [u8],
) -> Result<(), RleError> {
    let nodes = build_table::<P, L>(runs);
    if nodes.len() > u32::MAX as usize {
        return Err(RleError::InputTooLarge);
    }
    let table_bytes = nodes.len() * PackedNode::<P, L>::SIZE;
    debug!("Table holds {} nodes ({} bytes).", nodes.len(), table_bytes);

    Header {
        format,
        decompressed_length: data.len() as u64,
        table_node_count: nodes.len() as u32,
    }
    .write_to(out);
    write_table(&nodes, &mut out[HEADER_SIZE..HEADER_SIZE + table_bytes]);
    interleave(data, &nodes, &mut out[HEADER_SIZE + table_bytes..]);
    Ok(())
}

/// The writer's state machine. Walk the node stream with an input cursor
/// and an output cursor over the verbatim region: each record names a gap
/// of verbatim bytes to copy, then a stretch of run bytes to step over.
fn interleave<P: NodeField, L: NodeField>(
    data: &[u8],
    nodes: &[PackedNode<P, L>],
    out: &mut [u8],
) {
    let mut src = 0_usize;
    let mut dst = 0_usize;

    let mut long_next = false;
    for node in nodes {
        if long_next {
            // The preceding signal already copied this record's gap.
            src += node.long_length() as usize;
            long_next = false;
            continue;
        }

        let length = node.length.as_u64() as usize;
        let gap = if length != 0 {
            node.prefix.as_u64() as usize
        } else if node.value != 0 {
            node.skip_length() as usize
        } else {
            long_next = true;
            node.prefix.as_u64() as usize
        };

        out[dst..dst + gap].copy_from_slice(&data[src..src + gap]);
        dst += gap;
        src += gap + length;
    }

    // Trailing verbatim bytes. The slice-length check doubles as the size
    // invariant: the cursors must exhaust input and output together.
    debug_assert_eq!(out.len() - dst, data.len() - src);
    out[dst..].copy_from_slice(&data[src..]);
}
