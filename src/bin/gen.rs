//! dnr-rulegen-gen: CLI tool for generating static DNR rule sets from an extension manifest.

use clap::{Parser, Subcommand};
use dnr_rulegen::{
    find_stale_rule_sets, generate_all_rule_sets, write_rule_sets, DirectorySink, GeneratorConfig,
    Manifest, MemorySink, PriorityTiers, GOOGLE_FIRST_PARTY_SCRIPT,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dnr-rulegen-gen")]
#[command(version = "0.1.0")]
#[command(about = "Generate static declarativeNetRequest rule sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all rule sets and write them to the output directory
    Generate {
        /// Extension manifest
        #[arg(short, long, default_value = "src/manifest.json")]
        manifest: PathBuf,

        /// Output directory for rule set files
        #[arg(short, long, default_value = "src/data/dnr")]
        output_dir: PathBuf,

        /// JSON file overriding rule priorities
        #[arg(short, long)]
        priorities: Option<PathBuf>,

        /// Content script listing first-party Google hosts
        #[arg(long, default_value = GOOGLE_FIRST_PARTY_SCRIPT)]
        script_id: String,

        /// Generate and validate without writing files
        #[arg(long)]
        dry_run: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the first-party Google hosts found in the manifest
    Hosts {
        /// Extension manifest
        #[arg(short, long, default_value = "src/manifest.json")]
        manifest: PathBuf,

        /// Content script listing first-party Google hosts
        #[arg(long, default_value = GOOGLE_FIRST_PARTY_SCRIPT)]
        script_id: String,
    },

    /// Check that stored rule set files are up to date
    Check {
        /// Extension manifest
        #[arg(short, long, default_value = "src/manifest.json")]
        manifest: PathBuf,

        /// Directory holding the rule set files
        #[arg(short, long, default_value = "src/data/dnr")]
        output_dir: PathBuf,

        /// JSON file overriding rule priorities
        #[arg(short, long)]
        priorities: Option<PathBuf>,

        /// Content script listing first-party Google hosts
        #[arg(long, default_value = GOOGLE_FIRST_PARTY_SCRIPT)]
        script_id: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            manifest,
            output_dir,
            priorities,
            script_id,
            dry_run,
            verbose,
        } => generate(
            &manifest,
            &output_dir,
            priorities.as_deref(),
            script_id,
            dry_run,
            verbose,
        ),
        Commands::Hosts {
            manifest,
            script_id,
        } => print_hosts(&manifest, &script_id),
        Commands::Check {
            manifest,
            output_dir,
            priorities,
            script_id,
        } => check(&manifest, &output_dir, priorities.as_deref(), script_id),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(
    priorities: Option<&Path>,
    script_id: String,
) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    let tiers = match priorities {
        Some(path) => PriorityTiers::load(path)?,
        None => PriorityTiers::default(),
    };
    Ok(GeneratorConfig::new(script_id, tiers))
}

fn generate(
    manifest_path: &Path,
    output_dir: &Path,
    priorities: Option<&Path>,
    script_id: String,
    dry_run: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Reading manifest: {:?}", manifest_path);
    }

    let manifest = Manifest::load(manifest_path)?;
    let config = load_config(priorities, script_id)?;
    let sets = generate_all_rule_sets(&manifest, &config)?;

    if dry_run {
        let mut sink = MemorySink::new();
        let report = write_rule_sets(&sets, &mut sink)?;
        println!("Dry run: {} rules generated, nothing written", report.total());
        return Ok(());
    }

    let mut sink = DirectorySink::new(output_dir);
    let report = write_rule_sets(&sets, &mut sink)?;

    if verbose {
        for (name, count) in report.iter() {
            println!("  {:?}: {} rules", sink.path_for(name), count);
        }
    }

    println!("All rule sets generated in {:?}", output_dir);
    Ok(())
}

fn print_hosts(manifest_path: &Path, script_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(manifest_path)?;
    for host in manifest.first_party_hosts(script_id)? {
        println!("{}", host);
    }
    Ok(())
}

fn check(
    manifest_path: &Path,
    output_dir: &Path,
    priorities: Option<&Path>,
    script_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(manifest_path)?;
    let config = load_config(priorities, script_id)?;
    let sets = generate_all_rule_sets(&manifest, &config)?;

    let stale = find_stale_rule_sets(&sets, output_dir)?;
    if !stale.is_empty() {
        let names: Vec<String> = stale.iter().map(|name| name.file_name()).collect();
        return Err(format!(
            "stale rule sets in {:?}: {}; rerun `dnr-rulegen-gen generate`",
            output_dir,
            names.join(", ")
        )
        .into());
    }

    println!("All rule sets in {:?} are up to date", output_dir);
    Ok(())
}
