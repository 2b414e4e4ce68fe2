use thiserror::Error;

pub type Result<T> = std::result::Result<T, InputsError>;

#[derive(Error, Debug)]
pub enum InputsError {
    #[error("Invalid accession '{0}'")]
    InvalidAccession(String),

    #[error("Invalid UniProt base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("FASTA record for {0} has no sequence")]
    EmptySequence(String),

    #[error("Sequence fetch failed for {accession}: {reason}")]
    Fetch { accession: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] foldrun_common::FoldrunError),
}
