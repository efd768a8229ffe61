/*
Analytic sizing of the encoding, computed before any node exists. For one
run and one candidate format we can count exactly how many records the table
builder will emit and how many input bytes those records absorb:

  - gaps wider than the prefix field cost skip nodes, one per maxSkip chunk
    plus one for an oversized remainder;
  - lengths beyond the length field cost signal+long pairs, one pair per
    maxLong chunk plus one pair for an oversized remainder;
  - any residual length costs one trailing standard node.

The saving of a run is the bytes its records absorb minus the bytes the
records themselves occupy. Prefix bytes are carried in the verbatim stream
either way, so they contribute nothing. Summed over all runs this predicts
the table's effect on the output size exactly; the table builder in
`table.rs` follows the same decomposition, and a test holds the two to byte
agreement.

The four per-format sums are independent, so large run lists estimate in
parallel.
*/

use log::debug;
use rayon::prelude::*;

use crate::compression::runs::Run;
use crate::format::node::{NodeField, NodeFormat, PackedNode};

/// Run count above which the four format estimates run on the pool.
const PAR_XPOINT: usize = 16_384;

/// Bytes saved by encoding `run` in the `(P, L)` layout. May be negative:
/// a short run in a wide layout can cost more table bytes than it absorbs.
fn run_saving<P: NodeField, L: NodeField>(run: &Run) -> i64 {
    let node_size = PackedNode::<P, L>::SIZE as u64;
    let mut nodes = 0_u64;
    let mut absorbed = 0_u64;

    // Skip nodes for an oversized gap.
    if run.prefix > P::MAX {
        let max_skip = PackedNode::<P, L>::MAX_SKIP;
        nodes += run.prefix / max_skip;
        if run.prefix % max_skip > P::MAX {
            nodes += 1;
        }
    }

    // Signal+long pairs for an oversized length.
    let mut length = run.length;
    if length > L::MAX {
        let max_long = PackedNode::<P, L>::MAX_LONG;
        let full_pairs = length / max_long;
        nodes += full_pairs * 2;
        length -= full_pairs * max_long;
        absorbed += full_pairs * max_long;
        if length > L::MAX {
            nodes += 2;
            absorbed += length;
            length = 0;
        }
    }

    // Trailing standard node. Always emitted for a nonzero residual: the
    // collector already counted the whole run out of the verbatim stream,
    // so every one of its bytes must be absorbed by some record.
    if length > 0 {
        nodes += 1;
        absorbed += length;
    }

    absorbed as i64 - (nodes * node_size) as i64
}

fn format_saving<P: NodeField, L: NodeField>(runs: &[Run]) -> i64 {
    runs.iter().map(run_saving::<P, L>).sum()
}

/// Predicted saving of one format over the whole run list.
pub fn estimate(format: NodeFormat, runs: &[Run]) -> i64 {
    match format {
        NodeFormat::P8L8 => format_saving::<u8, u8>(runs),
        NodeFormat::P8L16 => format_saving::<u8, u16>(runs),
        NodeFormat::P16L8 => format_saving::<u16, u8>(runs),
        NodeFormat::P16L16 => format_saving::<u16, u16>(runs),
    }
}

/// Estimate all four formats and pick the best strictly-positive saving.
/// Returns `None` when no format saves anything; the caller must refuse to
/// deflate. Candidates are compared in record-size order with a strict
/// greater-than, so equal savings select the smaller record.
pub fn select_format(runs: &[Run]) -> Option<(NodeFormat, i64)> {
    let savings: Vec<i64> = if runs.len() > PAR_XPOINT {
        NodeFormat::ALL
            .as_slice()
            .par_iter()
            .map(|format| estimate(*format, runs))
            .collect()
    } else {
        NodeFormat::ALL
            .iter()
            .map(|format| estimate(*format, runs))
            .collect()
    };

    let mut best: Option<(NodeFormat, i64)> = None;
    for (format, saving) in NodeFormat::ALL.into_iter().zip(savings) {
        debug!("Format {} predicts a saving of {} bytes.", format, saving);
        if saving > best.map_or(0, |(_, s)| s) {
            best = Some((format, saving));
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::table::build_table;

    /// Walk a materialized table and measure the saving it actually
    /// achieves: bytes absorbed by standard and long records minus the
    /// table's own size.
    fn measure<P: NodeField, L: NodeField>(nodes: &[PackedNode<P, L>]) -> i64 {
        let mut absorbed = 0_i64;
        let mut long_next = false;
        for node in nodes {
            if long_next {
                absorbed += node.long_length() as i64;
                long_next = false;
                continue;
            }
            long_next = node.length.as_u64() == 0 && node.value == 0;
            absorbed += node.length.as_u64() as i64;
        }
        absorbed - (nodes.len() * PackedNode::<P, L>::SIZE) as i64
    }

    fn assert_estimate_matches_table(runs: &[Run]) {
        assert_eq!(
            estimate(NodeFormat::P8L8, runs),
            measure(&build_table::<u8, u8>(runs))
        );
        assert_eq!(
            estimate(NodeFormat::P8L16, runs),
            measure(&build_table::<u8, u16>(runs))
        );
        assert_eq!(
            estimate(NodeFormat::P16L8, runs),
            measure(&build_table::<u16, u8>(runs))
        );
        assert_eq!(
            estimate(NodeFormat::P16L16, runs),
            measure(&build_table::<u16, u16>(runs))
        );
    }

    #[test]
    fn single_short_run_savings() {
        let runs = [Run {
            prefix: 4,
            length: 50,
            value: 0xFF,
        }];
        assert_eq!(estimate(NodeFormat::P8L8, &runs), 47);
        assert_eq!(estimate(NodeFormat::P8L16, &runs), 46);
        assert_eq!(estimate(NodeFormat::P16L8, &runs), 46);
        assert_eq!(estimate(NodeFormat::P16L16, &runs), 45);
    }

    #[test]
    fn long_run_prefers_wide_length_field() {
        // 300 overflows an 8-bit length field, forcing a 6-byte
        // signal+long pair where a 16-bit field needs one 4-byte standard.
        let runs = [Run {
            prefix: 0,
            length: 300,
            value: 0,
        }];
        assert_eq!(estimate(NodeFormat::P8L8, &runs), 294);
        assert_eq!(estimate(NodeFormat::P8L16, &runs), 296);
        assert_eq!(select_format(&runs), Some((NodeFormat::P8L16, 296)));
    }

    #[test]
    fn oversized_prefix_costs_skips() {
        let runs = [Run {
            prefix: 70_000,
            length: 100,
            value: 0,
        }];
        // P8L8: two skips (65535 + 4465) and one standard.
        assert_eq!(estimate(NodeFormat::P8L8, &runs), 100 - 3 * 3);
        // P16L8: one skip (70000 <= 0xFFFFFF) and one standard.
        assert_eq!(estimate(NodeFormat::P16L8, &runs), 100 - 2 * 4);
    }

    #[test]
    fn negative_saving_is_reported() {
        // A 4-byte run in the 5-byte layout loses a byte.
        let runs = [Run {
            prefix: 0,
            length: 4,
            value: 1,
        }];
        assert_eq!(estimate(NodeFormat::P16L16, &runs), -1);
    }

    #[test]
    fn no_runs_is_inefficient() {
        assert_eq!(select_format(&[]), None);
    }

    #[test]
    fn all_negative_is_inefficient() {
        // A tiny run behind a wide gap costs more than it saves in every
        // layout: P8L8 pays a skip, P16 layouts pay wide records.
        let runs = [Run {
            prefix: 300,
            length: 4,
            value: 7,
        }];
        assert_eq!(select_format(&runs), None);
    }

    #[test]
    fn tie_breaks_to_smaller_record() {
        // Two short runs favor P8L8 by one byte each; one 300-byte run
        // favors P8L16 by two. Equal totals must select P8L8.
        let runs = [
            Run {
                prefix: 0,
                length: 10,
                value: 1,
            },
            Run {
                prefix: 5,
                length: 10,
                value: 2,
            },
            Run {
                prefix: 5,
                length: 300,
                value: 3,
            },
        ];
        let p8l8 = estimate(NodeFormat::P8L8, &runs);
        let p8l16 = estimate(NodeFormat::P8L16, &runs);
        assert_eq!(p8l8, p8l16);
        assert_eq!(select_format(&runs), Some((NodeFormat::P8L8, p8l8)));
    }

    #[test]
    fn estimate_agrees_with_materialized_tables() {
        let runs = [
            Run {
                prefix: 0,
                length: 4,
                value: 0,
            },
            Run {
                prefix: 300,
                length: 5,
                value: 1,
            },
            Run {
                prefix: 70_000,
                length: 300,
                value: 2,
            },
            Run {
                prefix: 2,
                length: 0xFFFF,
                value: 3,
            },
            Run {
                prefix: 0,
                length: 0xFFFF + 3, // leaves a tiny long-run remainder
                value: 4,
            },
            Run {
                prefix: 9,
                length: 300_000,
                value: 5,
            },
            Run {
                prefix: 0xFFFF + 1,
                length: 0x1_0000_0000, // several pairs in every layout
                value: 6,
            },
        ];
        assert_estimate_matches_table(&runs);
    }
}
