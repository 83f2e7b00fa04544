// Tabular output module
//
// Writes HSPs as BLAST outfmt 6 lines:
//   qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore
//
// Coordinates are 1-based and inclusive. Reverse-strand hits report the
// subject interval from end to start. Chain-only HSPs append two columns,
// the mapping quality and the anchor count.

use std::io::Write;

use crate::core::sequence::TargetDb;
use crate::pipelines::linear::finalization::{Hsp, Match};

/// Column header for `--header` style output.
pub const TABULAR_HEADER: &str =
    "qseqid\tsseqid\tpident\tlength\tmismatch\tgapopen\tqstart\tqend\tsstart\tsend\tevalue\tbitscore";

/// Format an E-value the way BLAST does: zero below the double range,
/// scientific notation for small values, fixed point otherwise.
pub fn format_evalue(evalue: f64) -> String {
    if evalue < 1e-180 {
        "0.0".to_string()
    } else if evalue < 0.01 {
        format!("{:.2e}", evalue)
    } else if evalue < 10.0 {
        format!("{:.3}", evalue)
    } else {
        format!("{:.0}", evalue)
    }
}

pub fn write_hsp<W: Write>(
    writer: &mut W,
    query_name: &str,
    target_name: &str,
    hsp: &Hsp,
) -> std::io::Result<()> {
    let (sstart, send) = if hsp.is_reverse() {
        (hsp.subject_range.end, hsp.subject_range.begin + 1)
    } else {
        (hsp.subject_range.begin + 1, hsp.subject_range.end)
    };

    write!(
        writer,
        "{}\t{}\t{:.2}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.1}",
        query_name,
        target_name,
        hsp.percent_identity(),
        hsp.length,
        hsp.mismatches,
        hsp.gap_openings,
        hsp.query_range.begin + 1,
        hsp.query_range.end,
        sstart,
        send,
        format_evalue(hsp.evalue),
        hsp.bit_score
    )?;

    if let (Some(mapq), Some(n_anchors)) = (hsp.mapping_quality, hsp.n_anchors) {
        write!(writer, "\t{}\t{}", mapq, n_anchors)?;
    }
    writeln!(writer)
}

/// Write every HSP of one query, in match order.
pub fn write_query_matches<W: Write>(
    writer: &mut W,
    query_name: &str,
    db: &TargetDb,
    matches: &[Match],
) -> std::io::Result<usize> {
    let mut written = 0;
    for m in matches {
        let target_name = db.name(m.target_id as usize);
        for hsp in &m.hsps {
            write_hsp(writer, query_name, target_name, hsp)?;
            written += 1;
        }
    }
    Ok(written)
}
