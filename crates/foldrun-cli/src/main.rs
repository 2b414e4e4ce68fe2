//! foldrun — AlphaFold3 batch runs on a shared cluster.
//! Entry point for the `foldrun` binary.

mod config;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use foldrun_contacts::{find_contacts_in_file, report, ContactOptions};
use foldrun_driver::{Af3Runner, BatchDriver};
use foldrun_inputs::generator::parse_accession_list;
use foldrun_inputs::{InputGenerator, UniProtClient};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "foldrun", version, about = "Run AlphaFold3 jobs in batch and analyse the results")]
struct Cli {
    /// Path to foldrun.toml (overrides FOLDRUN_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every job document in the input directory through AlphaFold3
    Run(RunArgs),
    /// Write AlphaFold3 job documents for UniProt accessions
    Generate(GenerateArgs),
    /// List protein residues within a cutoff of a ligand in an mmCIF file
    Contacts(ContactsArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory with the AlphaFold3 model parameters
    #[arg(long)]
    model_dir: Option<PathBuf>,
    /// Directory containing *.json job documents
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Directory results are written to (created if missing)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Prediction executable, looked up on PATH unless it contains a '/'
    #[arg(long)]
    executable: Option<PathBuf>,
    /// Fail the batch if any job fails, not only the last one
    #[arg(long)]
    strict: bool,
    /// Validate the environment and list jobs without running them
    #[arg(long)]
    dry_run: bool,
    /// Extra arguments passed to every invocation (after `--`)
    #[arg(last = true)]
    extra_args: Vec<OsString>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// UniProt accessions
    accessions: Vec<String>,
    /// File with one accession per line ('#' starts a comment)
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Output directory for the generated documents
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Ligand CCD codes paired with every protein
    #[arg(long, value_delimiter = ',')]
    ligand: Option<Vec<String>>,
    /// Generate protein-only documents
    #[arg(long, conflicts_with = "ligand")]
    no_ligand: bool,
    /// Model seeds
    #[arg(long, value_delimiter = ',')]
    seeds: Option<Vec<u32>>,
}

#[derive(Args, Debug)]
struct ContactsArgs {
    /// Input mmCIF file
    cif: PathBuf,
    /// 3-letter ligand code
    #[arg(long)]
    ligand: Option<String>,
    /// Distance cutoff in Å
    #[arg(long)]
    cutoff: Option<f64>,
    /// Optional CSV output filename
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Include waters as potential contacts
    #[arg(long)]
    include_waters: bool,
    /// Only treat the twenty standard amino acids as protein
    #[arg(long)]
    strict_aa: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout is reserved for reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => run_batch(&config, args).await,
        Commands::Generate(args) => generate(&config, args).await,
        Commands::Contacts(args) => contacts(&config, args),
    }
}

async fn run_batch(config: &config::Config, args: RunArgs) -> anyhow::Result<()> {
    let mut config = config.clone();
    config.batch.apply_args(&args);

    let mut run_config = config.run_config().with_dry_run(args.dry_run);
    if !args.extra_args.is_empty() {
        run_config = run_config.with_extra_args(args.extra_args);
    }

    info!("Model directory:  {:?}", run_config.model_dir);
    info!("Input directory:  {:?}", run_config.input_dir);
    info!("Output directory: {:?}", run_config.output_dir);

    let runner = Af3Runner::new(&run_config.executable).with_extra_args(run_config.extra_args.clone());
    let driver = BatchDriver::new(run_config, runner);
    driver.run().await?;
    Ok(())
}

async fn generate(config: &config::Config, args: GenerateArgs) -> anyhow::Result<()> {
    let mut inputs = config.inputs.clone();
    if let Some(dir) = args.output_dir {
        inputs.output_dir = dir;
    }
    if let Some(codes) = args.ligand {
        inputs.ligand_ccd_codes = codes.into_iter().map(|c| c.to_uppercase()).collect();
    }
    if args.no_ligand {
        inputs.ligand_ccd_codes.clear();
    }
    if let Some(seeds) = args.seeds {
        inputs.model_seeds = seeds;
    }

    let mut accessions: Vec<String> = args.accessions.iter().map(|a| a.to_uppercase()).collect();
    if let Some(file) = &args.file {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read accession list {:?}", file))?;
        accessions.extend(parse_accession_list(&content));
    }
    if accessions.is_empty() {
        anyhow::bail!("No UniProt accessions given (pass them as arguments or with --file)");
    }

    let mut client = UniProtClient::new()?;
    if let Some(url) = &inputs.uniprot_base_url {
        client = client.with_base_url(url)?;
    }
    let generator = InputGenerator::new(client, inputs.generator_config());
    let summary = generator.generate(&accessions).await?;
    if summary.written.is_empty() {
        anyhow::bail!("No job documents were written ({} accession(s) skipped)", summary.skipped.len());
    }
    Ok(())
}

fn contacts(config: &config::Config, args: ContactsArgs) -> anyhow::Result<()> {
    let options = ContactOptions {
        ligand: args.ligand.unwrap_or_else(|| config.contacts.ligand.clone()).to_uppercase(),
        cutoff: args.cutoff.unwrap_or(config.contacts.cutoff),
        include_waters: args.include_waters,
        standard_aa_only: args.strict_aa,
    };
    if !(options.cutoff > 0.0) {
        anyhow::bail!("Cutoff must be a positive distance, got {}", options.cutoff);
    }

    let reports = find_contacts_in_file(&args.cif, &options)?;
    print!("{}", report::render_text(&reports, options.cutoff));

    if let Some(path) = &args.csv {
        if !reports.is_empty() {
            report::write_csv_file(path, &reports)?;
            info!("CSV written to: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_passes_trailing_args_through() {
        let cli = Cli::parse_from([
            "foldrun", "run", "--strict", "--model-dir", "/models", "--", "--num_recycles=3",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.strict);
                assert_eq!(args.model_dir, Some(PathBuf::from("/models")));
                assert_eq!(args.extra_args, vec![OsString::from("--num_recycles=3")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_contacts_flags() {
        let cli = Cli::parse_from([
            "foldrun", "contacts", "model.cif", "--ligand", "gsh", "--cutoff", "5", "--strict-aa",
        ]);
        match cli.command {
            Commands::Contacts(args) => {
                assert_eq!(args.ligand.as_deref(), Some("gsh"));
                assert_eq!(args.cutoff, Some(5.0));
                assert!(args.strict_aa);
                assert!(!args.include_waters);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generate_splits_ligand_codes() {
        let cli = Cli::parse_from(["foldrun", "generate", "P09211", "--ligand", "GSH,NAD"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.accessions, vec!["P09211".to_string()]);
                assert_eq!(args.ligand, Some(vec!["GSH".to_string(), "NAD".to_string()]));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
