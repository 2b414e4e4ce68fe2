//! foldrun-inputs — Builds AlphaFold3 job documents for a list of UniProt
//! accessions: fetch each sequence, pair it with the ligand of interest and
//! write one document per accession.

pub mod error;
pub mod fasta;
pub mod generator;
pub mod uniprot;

pub use error::{InputsError, Result};
pub use generator::{GenerationSummary, GeneratorConfig, InputGenerator};
pub use uniprot::{SequenceSource, UniProtClient};
