//! Residue classification tables.

/// The twenty standard amino acids.
pub const STANDARD_AMINO_ACIDS: [&str; 20] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
];

/// Non-standard and modified amino acids commonly seen in deposited and
/// predicted structures.
pub const MODIFIED_AMINO_ACIDS: &[&str] = &[
    "SEC", "PYL", "MSE", "ASX", "GLX", "UNK", "HYP", "MLY", "M3L", "SEP",
    "TPO", "PTR", "CSO", "CSD", "CME", "KCX", "LLP", "PCA", "OCS", "CSS",
    "MLZ", "ALY", "FME", "NLE", "ABA", "AIB", "DAL", "DLE", "DVA", "ORN",
];

/// Water residue names.
pub const WATERS: [&str; 3] = ["HOH", "WAT", "DOD"];

pub fn is_standard_amino_acid(resname: &str) -> bool {
    STANDARD_AMINO_ACIDS.contains(&resname)
}

/// `standard_only` restricts the check to the twenty standard residues.
pub fn is_amino_acid(resname: &str, standard_only: bool) -> bool {
    is_standard_amino_acid(resname) || (!standard_only && MODIFIED_AMINO_ACIDS.contains(&resname))
}

pub fn is_water(resname: &str) -> bool {
    WATERS.contains(&resname)
}
