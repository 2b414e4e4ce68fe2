//! Writes one AlphaFold3 job document per accession.

use foldrun_common::job_spec::{ChainIds, Entity, JobDocument, LigandEntity, PolymerEntity};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::uniprot::SequenceSource;

/// Shape of the generated documents.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Prefix for the document `name` field.
    pub name_prefix: String,
    pub model_seeds: Vec<u32>,
    pub protein_chains: Vec<String>,
    pub ligand_chains: Vec<String>,
    /// CCD codes of the ligand; empty means protein-only documents.
    pub ligand_ccd_codes: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("AF3_json_inputs"),
            name_prefix: "AF3_".to_string(),
            model_seeds: vec![1],
            protein_chains: vec!["A".to_string(), "B".to_string()],
            ligand_chains: vec!["C".to_string(), "D".to_string()],
            ligand_ccd_codes: vec!["GSH".to_string()],
        }
    }
}

/// Counts of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

pub struct InputGenerator<S> {
    source: S,
    config: GeneratorConfig,
}

impl<S: SequenceSource> InputGenerator<S> {
    pub fn new(source: S, config: GeneratorConfig) -> Self {
        Self { source, config }
    }

    /// Assemble the document for one accession.
    pub fn build_document(&self, accession: &str, sequence: &str) -> JobDocument {
        let mut doc = JobDocument::new(format!("{}{}", self.config.name_prefix, accession))
            .with_seeds(self.config.model_seeds.clone())
            .with_entity(Entity::Protein(PolymerEntity {
                id: ChainIds::from(self.config.protein_chains.clone()),
                sequence: sequence.to_string(),
            }));
        if !self.config.ligand_ccd_codes.is_empty() {
            doc = doc.with_entity(Entity::Ligand(LigandEntity {
                id: ChainIds::from(self.config.ligand_chains.clone()),
                ccd_codes: Some(self.config.ligand_ccd_codes.clone()),
                smiles: None,
            }));
        }
        doc
    }

    /// Write `<accession>.json` into the output directory.
    pub async fn write_document(&self, accession: &str, doc: &JobDocument) -> Result<PathBuf> {
        doc.validate()?;
        let path = document_path(&self.config.output_dir, accession);
        tokio::fs::write(&path, doc.to_pretty_json()?).await?;
        Ok(path)
    }

    /// Fetch and write every accession. A failed fetch skips that accession.
    pub async fn generate(&self, accessions: &[String]) -> Result<GenerationSummary> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let mut summary = GenerationSummary::default();

        for accession in accessions {
            let sequence = match self.source.fetch_sequence(accession).await {
                Ok(seq) => seq,
                Err(e) => {
                    warn!("Skipping {}: {}", accession, e);
                    summary.skipped.push(accession.clone());
                    continue;
                }
            };
            let doc = self.build_document(accession, &sequence);
            let path = self.write_document(accession, &doc).await?;
            info!("Generated: {}", path.display());
            summary.written.push(path);
        }

        info!(
            "{} document(s) written to {:?}, {} skipped",
            summary.written.len(),
            self.config.output_dir,
            summary.skipped.len()
        );
        Ok(summary)
    }
}

fn document_path(dir: &Path, accession: &str) -> PathBuf {
    dir.join(format!("{}.json", accession))
}

/// Parse an accession list: one per line, `#` starts a comment.
pub fn parse_accession_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .flat_map(|line| line.split([',', ' ', '\t']))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_uppercase())
        .collect()
}
