//! Coded nucleotide sequences and the in-memory target database.

use std::io;
use std::path::Path;

use super::compute::encoding::{encode_sequence, reverse_complement};
use super::io::fasta_reader::FastaSource;

/// A nucleotide sequence stored as codes (A=0 C=1 G=2 T=3 N=4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    codes: Vec<u8>,
}

impl Sequence {
    pub fn from_codes(codes: Vec<u8>) -> Self {
        Self { codes }
    }

    pub fn from_ascii(seq: &[u8]) -> Self {
        Self {
            codes: encode_sequence(seq),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code at position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> u8 {
        self.codes[i]
    }

    /// Half-open slice `[begin, end)`.
    #[inline]
    pub fn subseq(&self, begin: usize, end: usize) -> &[u8] {
        &self.codes[begin..end]
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.codes
    }

    pub fn reverse_complement(&self) -> Sequence {
        Sequence {
            codes: reverse_complement(&self.codes),
        }
    }
}

/// A named query sequence as read from input.
#[derive(Debug, Clone)]
pub struct Query {
    pub name: String,
    pub sequence: Sequence,
}

/// Collection of target sequences addressed by dense integer id.
#[derive(Debug, Clone, Default)]
pub struct TargetDb {
    names: Vec<String>,
    seqs: Vec<Sequence>,
    total_letters: u64,
}

impl TargetDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target and return its id.
    pub fn push(&mut self, name: impl Into<String>, seq: Sequence) -> usize {
        self.total_letters += seq.len() as u64;
        self.names.push(name.into());
        self.seqs.push(seq);
        self.seqs.len() - 1
    }

    /// Load every record of a FASTA file as a target.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut db = TargetDb::new();
        for record in FastaSource::open(path)? {
            let (name, seq) = record?;
            db.push(name, seq);
        }
        log::debug!(
            "Loaded {} targets ({} letters)",
            db.len(),
            db.total_letters()
        );
        Ok(db)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    #[inline]
    pub fn get(&self, id: usize) -> &Sequence {
        &self.seqs[id]
    }

    #[inline]
    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    /// Sum of all target lengths, used as the database size in E-values.
    #[inline]
    pub fn total_letters(&self) -> u64 {
        self.total_letters
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Sequence)> {
        self.seqs.iter().enumerate()
    }
}

/// Read every record of a FASTA file as a query.
pub fn read_queries<P: AsRef<Path>>(path: P) -> io::Result<Vec<Query>> {
    FastaSource::open(path)?
        .map(|record| record.map(|(name, sequence)| Query { name, sequence }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_accessors() {
        let s = Sequence::from_ascii(b"ACGTN");
        assert_eq!(s.len(), 5);
        assert_eq!(s.get(2), 2);
        assert_eq!(s.subseq(1, 3), &[1, 2]);
        assert_eq!(s.reverse_complement().as_slice(), &[4, 0, 1, 2, 3]);
    }

    #[test]
    fn test_target_db_totals() {
        let mut db = TargetDb::new();
        assert_eq!(db.push("t0", Sequence::from_ascii(b"ACGT")), 0);
        assert_eq!(db.push("t1", Sequence::from_ascii(b"AC")), 1);
        assert_eq!(db.len(), 2);
        assert_eq!(db.total_letters(), 6);
        assert_eq!(db.name(1), "t1");
    }
}
