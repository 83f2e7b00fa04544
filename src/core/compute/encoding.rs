//! # Nucleotide encoding
//!
//! Every sequence handed to the search pipeline is stored as small integer
//! codes rather than ASCII:
//!
//! ```text
//!   A=0  C=1  G=2  T=3  N/other=4
//! ```
//!
//! Codes `0..4` take part in exact matching, seeding and ungapped extension.
//! Code `4` never matches anything, including another `N`. The aligners
//! score it as a mismatch.

/// Number of distinct codes, including the ambiguity code.
pub const ALPHABET_SIZE: usize = 5;

/// Code assigned to `N` and to any byte that is not a nucleotide.
pub const AMBIGUOUS_CODE: u8 = 4;

const CODE_TO_BASE: [u8; ALPHABET_SIZE] = [b'A', b'C', b'G', b'T', b'N'];

/// Convert an ASCII base to its code.
///
/// - A/a → 0
/// - C/c → 1
/// - G/g → 2
/// - T/t and U/u → 3
/// - N/n/other → 4
#[inline]
pub fn base_to_code(base: u8) -> u8 {
    match base {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' | b'U' | b'u' => 3,
        _ => AMBIGUOUS_CODE,
    }
}

/// Convert a code back to its upper-case ASCII base.
#[inline]
pub fn code_to_base(code: u8) -> u8 {
    CODE_TO_BASE[(code as usize).min(ALPHABET_SIZE - 1)]
}

/// Complement of a code (A↔T, C↔G, N→N).
#[inline]
pub fn complement_code(code: u8) -> u8 {
    match code {
        0 => 3,
        1 => 2,
        2 => 1,
        3 => 0,
        _ => AMBIGUOUS_CODE,
    }
}

/// True if the code is one of A, C, G or T.
#[inline]
pub fn is_unambiguous(code: u8) -> bool {
    code < AMBIGUOUS_CODE
}

/// Encode an ASCII sequence.
pub fn encode_sequence(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| base_to_code(b)).collect()
}

/// Decode a coded sequence back to ASCII.
pub fn decode_sequence(codes: &[u8]) -> Vec<u8> {
    codes.iter().map(|&c| code_to_base(c)).collect()
}

/// Reverse complement of a coded sequence.
pub fn reverse_complement(codes: &[u8]) -> Vec<u8> {
    codes.iter().rev().map(|&c| complement_code(c)).collect()
}
