use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

use taxdump_rs::dump::NameDedup;
use taxdump_rs::lineage::{build_rank_table, read_rank_table, read_species_list};
use taxdump_rs::resolve::{MapResolver, Resolver};
use taxdump_rs::taxdb::{parse_ncbi_dump, parse_taxdb, TaxDb};
use taxdump_rs::{build_taxdump, TaxdumpConfig};

#[derive(Parser)]
#[command(name = "taxdump-rs")]
#[command(about = "Generate NCBI-like taxdump files (names.dmp, nodes.dmp) from a species list or rank table")]
#[command(version)]
struct Cli {
    /// Species names, one per line. Lineages are looked up in the taxonomy.
    #[arg(long, conflicts_with = "rank_table", required_unless_present = "rank_table")]
    species_list: Option<PathBuf>,

    /// Tab-separated table with one column per rank (header required).
    #[arg(long)]
    rank_table: Option<PathBuf>,

    /// taxDB file (taxid, parent, name, rank).
    #[arg(long, conflicts_with_all = ["nodes", "names"])]
    taxdb: Option<PathBuf>,

    /// NCBI nodes.dmp (optionally .gz).
    #[arg(long, requires = "names")]
    nodes: Option<PathBuf>,

    /// NCBI names.dmp (optionally .gz).
    #[arg(long, requires = "nodes")]
    names: Option<PathBuf>,

    /// Directory for names.dmp and nodes.dmp; created if missing.
    #[arg(long)]
    output_dir: PathBuf,

    /// Impute missing taxonomic ranks with 'unknownN' placeholders.
    #[arg(long)]
    impute: bool,

    /// Write each taxon name once even when its rows are not adjacent.
    #[arg(long)]
    global_name_dedup: bool,
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner
}

fn load_taxonomy(cli: &Cli) -> Result<Option<TaxDb>, Box<dyn std::error::Error>> {
    let db = match (&cli.taxdb, &cli.nodes, &cli.names) {
        (Some(taxdb), _, _) => parse_taxdb(taxdb)?,
        (None, Some(nodes), Some(names)) => parse_ncbi_dump(nodes, names)?,
        _ => return Ok(None),
    };
    Ok(Some(db))
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Taxonomy
    let sp = spinner("blue", "Loading taxonomy...");
    let taxonomy = load_taxonomy(&cli)?;
    match &taxonomy {
        Some(db) if db.is_empty() => {
            sp.finish_with_message("Taxonomy is empty; identifiers fall back to names.")
        }
        Some(db) => sp.finish_with_message(format!("Loaded {} taxa.", db.len())),
        None => sp.finish_with_message("No taxonomy given; identifiers fall back to names."),
    }

    // 2. Rank table
    let sp = spinner("green", "Collecting lineages...");
    let table = match (&cli.species_list, &cli.rank_table) {
        (Some(list), _) => {
            let db = taxonomy
                .as_ref()
                .ok_or("--species-list needs a taxonomy (--taxdb or --nodes/--names)")?;
            build_rank_table(&read_species_list(list)?, db)?
        }
        (None, Some(path)) => read_rank_table(path)?,
        (None, None) => return Err("one of --species-list or --rank-table is required".into()),
    };
    sp.finish_with_message(format!("{} record(s) ready.", table.len()));

    // 3. Dumps
    let sp = spinner("yellow", "Building taxdump...");
    let config = TaxdumpConfig {
        impute: cli.impute,
        name_dedup: if cli.global_name_dedup {
            NameDedup::Global
        } else {
            NameDedup::Predecessor
        },
    };
    let fallback = MapResolver::new();
    let resolver: &dyn Resolver = match &taxonomy {
        Some(db) => db,
        None => &fallback,
    };
    let results = build_taxdump(&table, resolver, &config)?;
    let (names_path, nodes_path) = results.write_to_dir(&cli.output_dir)?;
    sp.finish_with_message(format!(
        "Wrote {} ({} entries) and {} ({} entries).",
        names_path.display(),
        results.names.len(),
        nodes_path.display(),
        results.nodes.len()
    ));

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
