use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContactsError>;

#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("mmCIF parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("mmCIF file has no _atom_site loop")]
    NoAtomSite,

    #[error("_atom_site is missing required column {0}")]
    MissingColumn(&'static str),

    #[error("Ligand {ligand} not found in {path:?}")]
    LigandNotFound { ligand: String, path: PathBuf },

    #[error("No protein atoms found (polymer not detected) in {0:?}")]
    NoProteinAtoms(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
