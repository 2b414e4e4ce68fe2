//! foldrun-contacts — Finds the protein residues within a distance cutoff of
//! a ligand in a predicted structure.
//!
//! 1. Parse the `_atom_site` table of an mmCIF file
//! 2. Split residues into ligand, protein and (optionally) water
//! 3. Grid-based neighbour search around every ligand atom
//! 4. Report the closest approach per contacting residue

pub mod contacts;
pub mod error;
pub mod mmcif;
pub mod report;
pub mod residues;
pub mod search;

pub use contacts::{find_contacts, find_contacts_in_file, Contact, ContactOptions, LigandReport};
pub use error::{ContactsError, Result};
