use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use todo::store::{format_item, parse_item, Store};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A CLI tool to manage todo items in a JSON file database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path of the database file
    #[arg(long, global = true, default_value = "./data/todo.json")]
    db: PathBuf,
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item given as a JSON string, e.g. '{"id":1,"title":"Learn Rust","done":false}'
    Add { item: String },
    /// List every item in the database
    List,
    /// Look up a single item by id
    Query { id: i64 },
    /// Replace an existing item, given as a JSON string with the same id
    Update { item: String },
    /// Delete an item by id
    Delete { id: i64 },
    /// Set the done status of an item
    Done { id: i64, value: bool },
    /// Overwrite the database from its .bak backup file
    Restore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    run(cli)
}

// All command dispatch happens here against the parsed Cli value, so the
// whole flow is drivable from a test without touching process globals.
fn run(cli: Cli) -> Result<()> {
    let store = Store::new(&cli.db)?;
    log::debug!("database file: {}", store.path().display());

    match cli.command {
        Commands::Add { item } => {
            let item = parse_item(&item)?;
            store.add_item(item.clone())?;
            log::debug!("added item {}", item.id);
            println!("✅ Item [{}] added.", item.id);
        }
        Commands::List => {
            let items = store.get_all_items()?;
            for item in &items {
                println!("{}", format_item(item)?);
            }
            println!("THERE ARE {} ITEMS IN THE DB", items.len());
        }
        Commands::Query { id } => {
            let item = store.get_item(id)?;
            println!("{}", format_item(&item)?);
        }
        Commands::Update { item } => {
            let item = parse_item(&item)?;
            store.update_item(item.clone())?;
            println!("✅ Item [{}] updated.", item.id);
        }
        Commands::Delete { id } => {
            store.delete_item(id)?;
            println!("✅ Item [{}] deleted.", id);
        }
        Commands::Done { id, value } => {
            store.set_done(id, value)?;
            println!("✅ Item [{}] done status set to {}.", id, value);
        }
        Commands::Restore => {
            store.restore()?;
            println!("✅ Database restored from {}", store.backup_path().display());
        }
    }
    Ok(())
}
