//! AlphaFold3 input documents.
//!
//! One document describes one prediction job: a name, the model seeds to
//! sample with, and the molecular entities that make up the complex.

use crate::error::{FoldrunError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dialect tag expected by the AlphaFold3 input parser.
pub const DIALECT: &str = "alphafold3";

/// Input schema version written by the generator.
pub const SCHEMA_VERSION: u32 = 3;

/// A complete job document as consumed by `run_alphafold.py --json_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDocument {
    pub name: String,
    pub model_seeds: Vec<u32>,
    pub sequences: Vec<Entity>,
    pub dialect: String,
    pub version: u32,
}

/// A molecular entity, tagged by its kind (`{"protein": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Protein(PolymerEntity),
    Rna(PolymerEntity),
    Dna(PolymerEntity),
    Ligand(LigandEntity),
}

/// Chain identifiers: AlphaFold3 accepts a single id or a list of copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainIds {
    Single(String),
    Multiple(Vec<String>),
}

impl ChainIds {
    pub fn as_slice(&self) -> &[String] {
        match self {
            ChainIds::Single(id) => std::slice::from_ref(id),
            ChainIds::Multiple(ids) => ids,
        }
    }
}

impl From<Vec<String>> for ChainIds {
    fn from(ids: Vec<String>) -> Self {
        ChainIds::Multiple(ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolymerEntity {
    pub id: ChainIds,
    pub sequence: String,
}

/// A small molecule, given either as CCD codes or as a SMILES string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LigandEntity {
    pub id: ChainIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccd_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

impl JobDocument {
    /// Create an empty document with a single seed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_seeds: vec![1],
            sequences: Vec::new(),
            dialect: DIALECT.to_string(),
            version: SCHEMA_VERSION,
        }
    }

    pub fn with_seeds(mut self, seeds: Vec<u32>) -> Self {
        self.model_seeds = seeds;
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.sequences.push(entity);
        self
    }

    /// Read and validate a document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc: JobDocument = serde_json::from_str(&content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serialize with a four-space indent, the layout the cluster recipe ships.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| FoldrunError::InvalidDocument(e.to_string()))
    }

    /// Check the structural rules AlphaFold3 enforces on input.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FoldrunError::InvalidDocument("name is empty".into()));
        }
        if self.dialect != DIALECT {
            return Err(FoldrunError::InvalidDocument(format!(
                "unsupported dialect '{}', expected '{}'",
                self.dialect, DIALECT
            )));
        }
        if self.model_seeds.is_empty() {
            return Err(FoldrunError::InvalidDocument("modelSeeds is empty".into()));
        }
        if self.sequences.is_empty() {
            return Err(FoldrunError::InvalidDocument("sequences is empty".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for entity in &self.sequences {
            let ids = match entity {
                Entity::Protein(p) | Entity::Rna(p) | Entity::Dna(p) => {
                    if p.sequence.is_empty() {
                        return Err(FoldrunError::InvalidDocument(format!(
                            "polymer {:?} has an empty sequence",
                            p.id.as_slice()
                        )));
                    }
                    &p.id
                }
                Entity::Ligand(l) => {
                    match (&l.ccd_codes, &l.smiles) {
                        (Some(codes), None) if !codes.is_empty() => {}
                        (None, Some(smiles)) if !smiles.is_empty() => {}
                        _ => {
                            return Err(FoldrunError::InvalidDocument(format!(
                                "ligand {:?} needs exactly one of ccdCodes or smiles",
                                l.id.as_slice()
                            )))
                        }
                    }
                    &l.id
                }
            };
            if ids.as_slice().is_empty() {
                return Err(FoldrunError::InvalidDocument("entity without chain ids".into()));
            }
            for id in ids.as_slice() {
                if !seen.insert(id.as_str()) {
                    return Err(FoldrunError::InvalidDocument(format!(
                        "chain id '{}' used more than once",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
