use std::path::PathBuf;

mod list;
mod terminal;

use canteen::{Confirmation, DataFile, DeleteOutcome, Inventory, ItemId, ItemPatch};
use clap::ArgAction;
use list::List;
use terminal::Colorize;
use tracing::instrument;

/// Parse an item id from a string.
///
/// This is a CLI boundary function; ids are positive integers.
fn parse_item_id(s: &str) -> Result<ItemId, String> {
    s.parse()
        .map_err(|_| format!("'{s}' is not a valid item id"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path of the inventory data file
    #[arg(short, long, default_value = "inventory.json", global = true)]
    file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.file)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the inventory listing with totals (default)
    List(List),

    /// Add a new item
    Add(Add),

    /// Increase an item's stock
    Increase(Increase),

    /// Decrease an item's stock
    Decrease(Decrease),

    /// Edit an item's details
    Edit(Edit),

    /// Delete an item
    Delete(Delete),
}

impl Command {
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(file)?,
            Self::Add(command) => command.run(file)?,
            Self::Increase(command) => command.run(file)?,
            Self::Decrease(command) => command.run(file)?,
            Self::Edit(command) => command.run(file)?,
            Self::Delete(command) => command.run(file)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The item name
    name: String,

    /// Units currently in stock
    #[clap(long, short)]
    quantity: i64,

    /// Unit price
    #[clap(long, short)]
    price: f64,

    /// Low-stock alert threshold
    #[clap(long, short, default_value_t = 1)]
    threshold: i64,
}

impl Add {
    #[instrument]
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let mut inventory = Inventory::open(DataFile::new(file));
        let item = inventory.add(&self.name, self.quantity, self.price, self.threshold)?;

        println!(
            "{}",
            format!("Added {} (id {})", item.name(), item.id()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Increase {
    /// The id of the item to restock
    #[clap(value_parser = parse_item_id)]
    id: ItemId,

    /// How many units to add
    #[arg(long, default_value_t = 1)]
    by: u32,
}

impl Increase {
    #[instrument]
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let mut inventory = Inventory::open(DataFile::new(file));
        let item = inventory.adjust_quantity(self.id, i64::from(self.by))?;

        println!(
            "{}",
            format!("Increased {} to {}", item.name(), item.quantity()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Decrease {
    /// The id of the item to take stock from
    #[clap(value_parser = parse_item_id)]
    id: ItemId,

    /// How many units to remove
    #[arg(long, default_value_t = 1)]
    by: u32,
}

impl Decrease {
    #[instrument]
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let mut inventory = Inventory::open(DataFile::new(file));
        let item = inventory.adjust_quantity(self.id, -i64::from(self.by))?;

        println!(
            "{}",
            format!("Decreased {} to {}", item.name(), item.quantity()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The id of the item to edit
    #[clap(value_parser = parse_item_id)]
    id: ItemId,

    /// New name
    #[clap(long)]
    name: Option<String>,

    /// New quantity
    #[clap(long)]
    quantity: Option<i64>,

    /// New unit price
    #[clap(long)]
    price: Option<f64>,

    /// New low-stock threshold
    #[clap(long)]
    threshold: Option<i64>,
}

impl Edit {
    #[instrument]
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let patch = ItemPatch {
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            threshold: self.threshold,
        };

        if patch == ItemPatch::default() {
            anyhow::bail!("nothing to change: provide at least one of --name, --quantity, --price, --threshold");
        }

        let mut inventory = Inventory::open(DataFile::new(file));
        let item = inventory.edit(self.id, patch)?;

        println!("{}", format!("Updated {}", item.name()).success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the item to delete
    #[clap(value_parser = parse_item_id)]
    id: ItemId,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let mut inventory = Inventory::open(DataFile::new(file));

        let Some(item) = inventory.get(self.id) else {
            anyhow::bail!("no item with id {}", self.id);
        };
        let name = item.name().to_string();

        // Resolve the confirmation before calling into the store; the store
        // only ever sees the final answer.
        let confirmation = if self.yes || Self::confirm(&name, self.id)? {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        };

        match inventory.delete(self.id, confirmation)? {
            DeleteOutcome::Deleted => {
                println!("{}", format!("Deleted '{name}'").success());
            }
            DeleteOutcome::Cancelled => {
                println!("Cancelled");
                std::process::exit(130);
            }
        }
        Ok(())
    }

    fn confirm(name: &str, id: ItemId) -> anyhow::Result<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(format!("Delete '{name}' (id {id})?"))
            .default(false)
            .interact()?)
    }
}
