//! Configuration loading for foldrun.
//! Reads foldrun.toml from the current directory or the path in FOLDRUN_CONFIG,
//! then applies FOLDRUN_* environment overrides. The file is optional.

use foldrun_driver::{FailurePolicy, RunConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_model_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("af3_models"))
        .unwrap_or_else(|| PathBuf::from("af3_models"))
}
fn default_input_dir()  -> PathBuf { PathBuf::from(".") }
fn default_output_dir() -> PathBuf { PathBuf::from("af3_output") }
fn default_executable() -> PathBuf { PathBuf::from(foldrun_driver::config::DEFAULT_EXECUTABLE) }

impl BatchConfig {
    /// Command-line values win over both the file and FOLDRUN_* variables.
    pub(crate) fn apply_args(&mut self, args: &crate::RunArgs) {
        let set = |target: &mut PathBuf, value: &Option<PathBuf>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        set(&mut self.model_dir, &args.model_dir);
        set(&mut self.input_dir, &args.input_dir);
        set(&mut self.output_dir, &args.output_dir);
        set(&mut self.executable, &args.executable);
        if args.strict {
            self.failure_policy = FailurePolicy::AnyInvocation;
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            executable: default_executable(),
            extra_args: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    #[serde(default = "default_inputs_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_seeds")]
    pub model_seeds: Vec<u32>,
    #[serde(default = "default_protein_chains")]
    pub protein_chains: Vec<String>,
    #[serde(default = "default_ligand_chains")]
    pub ligand_chains: Vec<String>,
    #[serde(default = "default_ligand_codes")]
    pub ligand_ccd_codes: Vec<String>,
    pub uniprot_base_url: Option<String>,
}

fn default_inputs_dir()     -> PathBuf     { PathBuf::from("AF3_json_inputs") }
fn default_name_prefix()    -> String      { "AF3_".to_string() }
fn default_seeds()          -> Vec<u32>    { vec![1] }
fn default_protein_chains() -> Vec<String> { vec!["A".to_string(), "B".to_string()] }
fn default_ligand_chains()  -> Vec<String> { vec!["C".to_string(), "D".to_string()] }
fn default_ligand_codes()   -> Vec<String> { vec!["GSH".to_string()] }

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_inputs_dir(),
            name_prefix: default_name_prefix(),
            model_seeds: default_seeds(),
            protein_chains: default_protein_chains(),
            ligand_chains: default_ligand_chains(),
            ligand_ccd_codes: default_ligand_codes(),
            uniprot_base_url: None,
        }
    }
}

impl InputsConfig {
    pub fn generator_config(&self) -> foldrun_inputs::GeneratorConfig {
        foldrun_inputs::GeneratorConfig {
            output_dir: self.output_dir.clone(),
            name_prefix: self.name_prefix.clone(),
            model_seeds: self.model_seeds.clone(),
            protein_chains: self.protein_chains.clone(),
            ligand_chains: self.ligand_chains.clone(),
            ligand_ccd_codes: self.ligand_ccd_codes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    #[serde(default = "default_ligand")]
    pub ligand: String,
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

fn default_ligand() -> String { "GSH".to_string() }
fn default_cutoff() -> f64    { 4.5 }

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            ligand: default_ligand(),
            cutoff: default_cutoff(),
        }
    }
}


impl Config {
    /// Load configuration from foldrun.toml, then apply environment overrides.
    /// An explicit path wins over FOLDRUN_CONFIG, which wins over the current directory.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var("FOLDRUN_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("foldrun.toml")),
        };
        if explicit.is_some() && !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }

        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Apply FOLDRUN_* overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |target: &mut PathBuf, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = PathBuf::from(value);
            }
        };
        set(&mut self.batch.model_dir, "FOLDRUN_MODEL_DIR");
        set(&mut self.batch.input_dir, "FOLDRUN_INPUT_DIR");
        set(&mut self.batch.output_dir, "FOLDRUN_OUTPUT_DIR");
        set(&mut self.batch.executable, "FOLDRUN_EXECUTABLE");
    }

    /// Freeze the batch section into the driver's run configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(
            &self.batch.model_dir,
            &self.batch.output_dir,
            &self.batch.input_dir,
        )
        .with_executable(&self.batch.executable)
        .with_extra_args(self.batch.extra_args.iter().cloned())
        .with_failure_policy(self.batch.failure_policy)
    }
}
