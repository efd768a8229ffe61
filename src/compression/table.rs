/*
Node table construction. Each run decomposes, in order, into:

  zero or more skip nodes   until the residual gap fits the prefix field
  zero or more signal+long  until the residual length fits the length field
  one standard node         whenever any residual length remains

The residual prefix travels in the first record that has a prefix field to
give it (the first signal, or the standard); later records of the same run
carry prefix zero, because both consumer state machines accumulate prefix
fields across a run's records.

Runs are independent once collected - a run's prefix is already relative to
the previous run's tail - so the table parallelizes by splitting the run
list into contiguous blocks, building each block's nodes on a worker, and
concatenating the per-block vectors in partition order.
*/

use log::debug;
use rayon::prelude::*;

use crate::compression::runs::Run;
use crate::format::node::{NodeField, PackedNode};

/// Below this many runs per prospective block the table is built inline;
/// fanning out costs more than it buys on small tables.
const MIN_RUNS_PER_BLOCK: usize = 256;

/// Append the node decomposition of one run.
fn parse_run<P: NodeField, L: NodeField>(run: &Run, out: &mut Vec<PackedNode<P, L>>) {
    let mut prefix = run.prefix;
    while prefix > P::MAX {
        let (node, consumed) = PackedNode::skip(prefix);
        prefix -= consumed;
        out.push(node);
    }

    let mut length = run.length;
    let mut pending_prefix = prefix;
    while length > L::MAX {
        out.push(PackedNode::signal(pending_prefix));
        pending_prefix = 0;
        let (node, consumed) = PackedNode::long(length, run.value);
        length -= consumed;
        out.push(node);
    }

    if length > 0 {
        out.push(PackedNode::standard(pending_prefix, length, run.value));
    }
}

/// Build the nodes for a contiguous slice of runs.
fn parse_run_set<P: NodeField, L: NodeField>(runs: &[Run]) -> Vec<PackedNode<P, L>> {
    let mut nodes = Vec::with_capacity(runs.len());
    for run in runs {
        parse_run(run, &mut nodes);
    }
    nodes
}

/// Materialize the full node table for the chosen `(P, L)` layout.
pub fn build_table<P: NodeField, L: NodeField>(runs: &[Run]) -> Vec<PackedNode<P, L>> {
    if runs.len() < MIN_RUNS_PER_BLOCK * 2 {
        return parse_run_set(runs);
    }

    let workers = rayon::current_num_threads().max(1);
    let block = (runs.len() / workers).max(MIN_RUNS_PER_BLOCK);
    debug!(
        "Building table from {} runs in blocks of {}.",
        runs.len(),
        block
    );

    // Contiguous, disjoint blocks; collect preserves partition order, so the
    // concatenation is the sequential table.
    runs.par_chunks(block)
        .map(parse_run_set::<P, L>)
        .collect::<Vec<_>>()
        .concat()
}

/// Serialize a table into `out`, field by field, little endian.
pub fn write_table<P: NodeField, L: NodeField>(nodes: &[PackedNode<P, L>], out: &mut [u8]) {
    let size = PackedNode::<P, L>::SIZE;
    for (node, slot) in nodes.iter().zip(out.chunks_exact_mut(size)) {
        node.write_to(slot);
    }
}
