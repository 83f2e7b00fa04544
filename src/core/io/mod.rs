pub mod fasta_reader;
pub mod tabular_output;
