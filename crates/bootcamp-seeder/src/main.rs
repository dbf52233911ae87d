use std::path::PathBuf;

use bootcamp_seeder::{SeedError, delete_all, import, load_documents};
use bootcamp_store::RedbStore;
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

/// Load or clear the bootcamp collection.
#[derive(Parser, Debug)]
#[command(name = "bootcamp-seeder", version, about)]
#[command(group(ArgGroup::new("action").required(true).args(["import", "delete"])))]
struct Cli {
    /// Insert every bootcamp from the seed file
    #[arg(short = 'i', long)]
    import: bool,

    /// Delete every bootcamp
    #[arg(short = 'd', long)]
    delete: bool,

    /// JSON array of bootcamps to import
    #[arg(long, default_value = "data/bootcamps.json")]
    file: PathBuf,

    /// redb database shared with the server
    #[arg(long, env = "BOOTCAMPS_DB_PATH")]
    db: PathBuf,
}

fn run(cli: &Cli) -> Result<(), SeedError> {
    let store = RedbStore::open(&cli.db)?;
    if cli.import {
        let docs = load_documents(&cli.file)?;
        import(&store, docs)?;
    } else {
        delete_all(&store)?;
    }
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "seeding failed");
        std::process::exit(1);
    }
}
