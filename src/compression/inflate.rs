/*
Inflation mirrors the writer from the outside in. Validate the header,
reinterpret the table region as nodes in the header's format, and fold the
node stream back into logical runs: skips and signals accumulate into a
pending prefix, a standard (or the long half of a signal pair) closes a run.
Reconstruction then alternates copying verbatim bytes and filling run bytes
into an output range of exactly the declared decompressed length.

Every cursor move is bounds checked. A table that walks off the verbatim
stream, an output that ends short, or trailing slack in either range all
mean the stream lies about itself, and all report as the same length error.
*/

use std::fs;
use std::fs::File;
use std::path::Path;

use log::{debug, info};

use crate::compression::runs::Run;
use crate::error::RleError;
use crate::format::header::{Header, HEADER_SIZE};
use crate::format::node::{NodeField, NodeFormat, PackedNode};
use crate::tools::mapped;

/// Inflate a compressed byte slice into a freshly allocated buffer.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, RleError> {
    let header = Header::parse(data)?;
    let table = table_region(data, &header)?;
    let runs = extract_runs(header.format, table, header.table_node_count as usize)?;
    debug!(
        "Recovered {} runs from a {} node table.",
        runs.len(),
        header.table_node_count
    );

    let verbatim = &data[HEADER_SIZE + table.len()..];
    let mut out = vec![0u8; header.decompressed_length as usize];
    reconstruct(&runs, verbatim, &mut out)?;
    Ok(out)
}

/// Inflate one file into another through memory-mapped views.
pub fn inflate_file(input: &Path, output: &Path) -> Result<(), RleError> {
    // Too short to map and parse; report it as the magic check would.
    if fs::metadata(input)?.len() < HEADER_SIZE as u64 {
        return Err(RleError::BadMagic);
    }
    let in_view = mapped::view(input)?;

    let header = Header::parse(&in_view)?;
    info!(
        "Inflating a {} stream of {} nodes into {} bytes.",
        header.format, header.table_node_count, header.decompressed_length
    );
    let table = table_region(&in_view, &header)?;
    let runs = extract_runs(header.format, table, header.table_node_count as usize)?;
    let verbatim = &in_view[HEADER_SIZE + table.len()..];

    // An empty output cannot be mapped; validate the stream and recreate
    // the empty file directly.
    if header.decompressed_length == 0 {
        reconstruct(&runs, verbatim, &mut [])?;
        File::create(output)?;
        return Ok(());
    }

    let mut out_view = mapped::view_mut(output, header.decompressed_length)?;
    reconstruct(&runs, verbatim, &mut out_view)?;
    out_view.flush()?;
    Ok(())
}

/// The table's byte region, validated against the stream length.
fn table_region<'a>(data: &'a [u8], header: &Header) -> Result<&'a [u8], RleError> {
    let table_bytes = header.table_node_count as usize * header.format.node_size();
    if HEADER_SIZE + table_bytes > data.len() {
        return Err(RleError::LengthMismatch);
    }
    Ok(&data[HEADER_SIZE..HEADER_SIZE + table_bytes])
}

/// Fold the packed table back into logical runs.
fn extract_runs(format: NodeFormat, table: &[u8], count: usize) -> Result<Vec<Run>, RleError> {
    match format {
        NodeFormat::P8L8 => extract::<u8, u8>(table, count),
        NodeFormat::P8L16 => extract::<u8, u16>(table, count),
        NodeFormat::P16L8 => extract::<u16, u8>(table, count),
        NodeFormat::P16L16 => extract::<u16, u16>(table, count),
    }
}

fn extract<P: NodeField, L: NodeField>(table: &[u8], count: usize) -> Result<Vec<Run>, RleError> {
    let size = PackedNode::<P, L>::SIZE;
    let mut runs = Vec::with_capacity(count);

    let mut pending_prefix = 0_u64;
    let mut i = 0_usize;
    while i < count {
        let node = PackedNode::<P, L>::read_from(&table[i * size..]);
        i += 1;

        if node.length.as_u64() == 0 {
            if node.value != 0 {
                // Skip: widen the pending gap, no run yet.
                pending_prefix += node.skip_length();
                continue;
            }
            // Signal: the next record must exist and is a long node.
            if i == count {
                return Err(RleError::LengthMismatch);
            }
            let long = PackedNode::<P, L>::read_from(&table[i * size..]);
            i += 1;
            runs.push(Run {
                prefix: pending_prefix + node.prefix.as_u64(),
                length: long.long_length(),
                value: long.value,
            });
            pending_prefix = 0;
            continue;
        }

        runs.push(Run {
            prefix: pending_prefix + node.prefix.as_u64(),
            length: node.length.as_u64(),
            value: node.value,
        });
        pending_prefix = 0;
    }

    Ok(runs)
}

/// Alternate verbatim copies and run fills into the output range. The
/// cursors must exhaust the verbatim stream and the output together.
fn reconstruct(runs: &[Run], verbatim: &[u8], out: &mut [u8]) -> Result<(), RleError> {
    let mut src = 0_usize;
    let mut dst = 0_usize;

    for run in runs {
        let prefix = run.prefix as usize;
        let length = run.length as usize;
        if src + prefix > verbatim.len() || dst + prefix + length > out.len() {
            return Err(RleError::LengthMismatch);
        }
        out[dst..dst + prefix].copy_from_slice(&verbatim[src..src + prefix]);
        src += prefix;
        dst += prefix;
        out[dst..dst + length].fill(run.value);
        dst += length;
    }

    if out.len() - dst != verbatim.len() - src {
        return Err(RleError::LengthMismatch);
    }
    out[dst..].copy_from_slice(&verbatim[src..]);
    Ok(())
}
