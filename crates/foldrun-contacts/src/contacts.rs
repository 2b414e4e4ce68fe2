//! Ligand contact detection.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ContactsError, Result};
use crate::mmcif::{Residue, Structure};
use crate::residues::{is_amino_acid, is_water};
use crate::search::NeighborGrid;

/// Options for a contact search.
#[derive(Debug, Clone)]
pub struct ContactOptions {
    /// Three-letter CCD code of the ligand.
    pub ligand: String,
    /// Distance cutoff in Å.
    pub cutoff: f64,
    /// Report waters within the cutoff as contacts too.
    pub include_waters: bool,
    /// Only the twenty standard amino acids count as protein.
    pub standard_aa_only: bool,
}

impl Default for ContactOptions {
    fn default() -> Self {
        Self {
            ligand: "GSH".to_string(),
            cutoff: 4.5,
            include_waters: false,
            standard_aa_only: false,
        }
    }
}

/// One residue in contact with a ligand instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub resname: String,
    pub chain: String,
    pub resnum: i32,
    pub icode: String,
    pub min_distance: f64,
}

/// All contacts of one ligand instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LigandReport {
    pub ligand: String,
    pub contacts: Vec<Contact>,
}

/// `"GSH Chain C 201"`, with the insertion code appended when present.
pub fn residue_label(resname: &str, chain: &str, resseq: i32, icode: &str) -> String {
    format!("{} Chain {} {}{}", resname, chain, resseq, icode.trim())
}

pub fn find_contacts_in_file(path: &Path, options: &ContactOptions) -> Result<Vec<LigandReport>> {
    info!("Reading structure {:?}", path);
    let structure = Structure::from_path(path)?;
    find_contacts(&structure, options).map_err(|e| match e {
        ContactsError::LigandNotFound { ligand, .. } => ContactsError::LigandNotFound {
            ligand,
            path: path.to_path_buf(),
        },
        ContactsError::NoProteinAtoms(_) => ContactsError::NoProteinAtoms(path.to_path_buf()),
        other => other,
    })
}

/// Find every partner residue within the cutoff of each ligand instance.
pub fn find_contacts(structure: &Structure, options: &ContactOptions) -> Result<Vec<LigandReport>> {
    let ligand_code = options.ligand.trim().to_uppercase();
    let residues = structure.residues();

    let mut ligands: Vec<&Residue> = Vec::new();
    // Partner residues and the residue index of every atom in the grid.
    let mut partners: Vec<&Residue> = Vec::new();
    let mut owner: Vec<usize> = Vec::new();
    let mut points: Vec<[f64; 3]> = Vec::new();
    let mut protein_atoms = 0usize;

    for residue in &residues {
        if residue.resname == ligand_code {
            ligands.push(residue);
            continue;
        }
        let water = is_water(&residue.resname);
        let protein = !water && is_amino_acid(&residue.resname, options.standard_aa_only);
        if protein {
            protein_atoms += residue.atoms.len();
        }
        if protein || (water && options.include_waters) {
            partners.push(residue);
            owner.extend(std::iter::repeat(partners.len() - 1).take(residue.atoms.len()));
            points.extend(residue.atoms.iter().copied());
        }
    }

    if ligands.is_empty() {
        return Err(ContactsError::LigandNotFound {
            ligand: ligand_code,
            path: Default::default(),
        });
    }
    if protein_atoms == 0 {
        return Err(ContactsError::NoProteinAtoms(Default::default()));
    }
    debug!(
        "{} ligand instance(s), {} partner residue(s), {} atoms in search grid",
        ligands.len(),
        partners.len(),
        points.len()
    );

    let grid = NeighborGrid::new(points, options.cutoff);
    let reports = ligands
        .into_iter()
        .map(|ligand| {
            let mut closest: HashMap<usize, f64> = HashMap::new();
            for atom in &ligand.atoms {
                for (i, d) in grid.within(atom, options.cutoff) {
                    let best = closest.entry(owner[i]).or_insert(f64::INFINITY);
                    if d < *best {
                        *best = d;
                    }
                }
            }

            let mut contacts: Vec<Contact> = closest
                .into_iter()
                .map(|(p, d)| {
                    let r = partners[p];
                    Contact {
                        resname: r.resname.clone(),
                        chain: r.chain.clone(),
                        resnum: r.resseq,
                        icode: r.icode.clone(),
                        min_distance: d,
                    }
                })
                .collect();
            contacts.sort_by(|a, b| {
                a.chain
                    .cmp(&b.chain)
                    .then(a.resnum.cmp(&b.resnum))
                    .then(a.min_distance.total_cmp(&b.min_distance))
                    .then(a.icode.cmp(&b.icode))
            });

            LigandReport {
                ligand: residue_label(&ligand.resname, &ligand.chain, ligand.resseq, &ligand.icode),
                contacts,
            }
        })
        .collect();

    Ok(reports)
}
