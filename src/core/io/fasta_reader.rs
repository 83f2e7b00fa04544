//! FASTA input for targets and queries.
//!
//! Compression is sniffed from the first bytes of the file, not its name:
//! BGZF blocks go through noodles' multithreaded reader, any other gzip
//! stream through flate2, everything else is read as plain text. Records come
//! out already encoded as [`Sequence`]s.

use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use noodles_bgzf as bgzf;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::core::sequence::Sequence;

const READ_BUFFER: usize = 1 << 22;

/// How a sequence file is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
    Bgzf,
}

impl Compression {
    /// Classify a file from its leading bytes. BGZF is a gzip member whose
    /// FEXTRA field starts with the `BC` subfield.
    pub fn sniff(header: &[u8]) -> Self {
        if header.len() < 4 || header[0] != 0x1f || header[1] != 0x8b {
            return Compression::Plain;
        }
        let has_extra = header[3] & 0x04 != 0;
        if has_extra && header.len() >= 14 && &header[12..14] == b"BC" {
            Compression::Bgzf
        } else {
            Compression::Gzip
        }
    }

    fn detect(path: &Path) -> io::Result<Self> {
        let mut header = Vec::with_capacity(18);
        File::open(path)?.take(18).read_to_end(&mut header)?;
        Ok(Self::sniff(&header))
    }
}

/// Streaming reader yielding `(name, sequence)` pairs.
pub struct FastaSource {
    records: fasta::Records<BufReader<Box<dyn Read>>>,
    compression: Compression,
}

impl FastaSource {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let compression = Compression::detect(path)?;
        let file = File::open(path)?;
        let inner: Box<dyn Read> = match compression {
            Compression::Bgzf => Box::new(bgzf::MultithreadedReader::new(file)),
            Compression::Gzip => Box::new(MultiGzDecoder::new(file)),
            Compression::Plain => Box::new(file),
        };
        log::debug!("Opening {} as {:?} FASTA", path.display(), compression);

        Ok(Self {
            records: fasta::Reader::from_bufread(BufReader::with_capacity(READ_BUFFER, inner)).records(),
            compression,
        })
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl Iterator for FastaSource {
    type Item = io::Result<(String, Sequence)>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(io::Error::new(io::ErrorKind::InvalidData, e))),
        };
        Some(Ok((record.id().to_string(), Sequence::from_ascii(record.seq()))))
    }
}
