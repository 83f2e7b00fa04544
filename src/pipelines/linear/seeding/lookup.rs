//! Exact k-mer seed lookup.
//!
//! The extender is agnostic to how seeds are found; it only needs a
//! [`SeedLookup`]. [`KmerIndex`] is the in-memory implementation used by the
//! binary: every k-mer of every target is hashed into an `FxHashMap`, and
//! k-mers occurring more often than a cap are dropped as repeats.

use rustc_hash::FxHashMap;

use super::anchor::SeedHit;
use crate::core::compute::encoding::is_unambiguous;
use crate::core::sequence::TargetDb;

/// Source of exact seed matches for a coded query.
pub trait SeedLookup: Send + Sync {
    fn lookup(&self, query: &[u8]) -> Vec<SeedHit>;
    fn seed_length(&self) -> usize;
}

/// Largest k that still packs into a `u64` at two bits per base.
pub const MAX_KMER_SIZE: usize = 32;

/// Calls `f(pos, packed)` for every k-mer free of ambiguous bases.
#[inline]
fn for_each_kmer(seq: &[u8], k: usize, mut f: impl FnMut(usize, u64)) {
    if k == 0 || seq.len() < k {
        return;
    }
    let mask: u64 = if k == MAX_KMER_SIZE {
        u64::MAX
    } else {
        (1u64 << (2 * k)) - 1
    };
    let mut kmer = 0u64;
    let mut valid = 0usize;
    for (i, &code) in seq.iter().enumerate() {
        if !is_unambiguous(code) {
            valid = 0;
            kmer = 0;
            continue;
        }
        kmer = ((kmer << 2) | code as u64) & mask;
        valid += 1;
        if valid >= k {
            f(i + 1 - k, kmer);
        }
    }
}

pub struct KmerIndex {
    k: usize,
    table: FxHashMap<u64, Vec<(u32, i32)>>,
}

impl KmerIndex {
    /// Index every k-mer of `db`, discarding k-mers seen more than
    /// `max_occurrences` times.
    pub fn build(db: &TargetDb, k: usize, max_occurrences: usize) -> Self {
        let k = k.clamp(1, MAX_KMER_SIZE);
        let mut table: FxHashMap<u64, Vec<(u32, i32)>> = FxHashMap::default();
        for (id, seq) in db.iter() {
            for_each_kmer(seq.as_slice(), k, |pos, kmer| {
                table.entry(kmer).or_default().push((id as u32, pos as i32));
            });
        }

        let before = table.len();
        table.retain(|_, hits| hits.len() <= max_occurrences);
        log::debug!(
            "KmerIndex: {} distinct {}-mers, {} dropped as repeats (> {} occurrences)",
            before,
            k,
            before - table.len(),
            max_occurrences
        );

        Self { k, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl SeedLookup for KmerIndex {
    fn lookup(&self, query: &[u8]) -> Vec<SeedHit> {
        let mut hits = Vec::new();
        for_each_kmer(query, self.k, |pos, kmer| {
            if let Some(targets) = self.table.get(&kmer) {
                hits.extend(targets.iter().map(|&(target_id, target_pos)| SeedHit {
                    query_pos: pos as i32,
                    target_id,
                    target_pos,
                }));
            }
        });
        hits
    }

    fn seed_length(&self) -> usize {
        self.k
    }
}
