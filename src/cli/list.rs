use std::path::PathBuf;

use canteen::{DataFile, Inventory, Item};
use clap::Parser;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show the inventory listing with low-stock alerts and totals")]
pub struct List {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and totals, format rows for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

const HEADERS: [&str; 6] = ["ID", "Name", "Quantity", "Price", "Threshold", "Status"];

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, file: PathBuf) -> anyhow::Result<()> {
        let inventory = Inventory::open(DataFile::new(file));

        if inventory.is_empty() {
            println!("Inventory is empty. Add an item with 'canteen add'.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => Self::output_json(&inventory)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&inventory);
                } else {
                    Self::output_table(&inventory);
                }
            }
        }

        Ok(())
    }

    fn output_json(inventory: &Inventory) -> anyhow::Result<()> {
        use serde_json::json;

        let items: Vec<_> = inventory
            .list()
            .into_iter()
            .map(|item| {
                json!({
                    "id": item.id().to_string(),
                    "name": item.name(),
                    "quantity": item.quantity(),
                    "price": item.price(),
                    "threshold": item.threshold(),
                    "low_stock": item.is_low_stock(),
                })
            })
            .collect();

        let output = json!({
            "items": items,
            "total_value": inventory.total_value(),
            "low_stock_count": inventory.low_stock_count(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(inventory: &Inventory) {
        for item in inventory.list() {
            println!(
                "{}\t{}\t{}\t{:.2}\t{}\t{}",
                item.id(),
                item.name(),
                item.quantity(),
                item.price(),
                item.threshold(),
                status_label(item),
            );
        }
    }

    fn output_table(inventory: &Inventory) {
        let sorted = inventory.list();

        if is_narrow() {
            // Stacked output for narrow terminals
            for item in &sorted {
                let status = if item.is_low_stock() {
                    format!(" {}", "LOW".alert())
                } else {
                    String::new()
                };
                println!(
                    "{} (id {}): {}/{} @ {:.2}{status}",
                    item.name(),
                    item.id(),
                    item.quantity(),
                    item.threshold(),
                    item.price(),
                );
            }
        } else {
            let rows: Vec<[String; 6]> = sorted
                .iter()
                .map(|item| {
                    [
                        item.id().to_string(),
                        item.name().to_string(),
                        item.quantity().to_string(),
                        format!("{:.2}", item.price()),
                        item.threshold().to_string(),
                        status_label(item).to_string(),
                    ]
                })
                .collect();

            // Determine column widths for alignment.
            let widths: Vec<usize> = HEADERS
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    rows.iter()
                        .map(|row| row[idx].len())
                        .max()
                        .unwrap_or(0)
                        .max(header.len())
                })
                .collect();

            for (header, width) in HEADERS.iter().zip(widths.iter().copied()) {
                print!("{header:<width$}  ");
            }
            println!();
            for &width in &widths {
                print!("{:-<width$}  ", "");
            }
            println!();

            for (row, item) in rows.iter().zip(&sorted) {
                for (idx, value) in row.iter().enumerate() {
                    let width = widths[idx];
                    if idx == 5 && item.is_low_stock() {
                        // Colour codes would break the padding, so pad first.
                        print!("{}  ", format!("{value:<width$}").alert());
                    } else {
                        print!("{value:<width$}  ");
                    }
                }
                println!();
            }
        }

        println!();
        println!("Total inventory value: {:.2}", inventory.total_value());

        let low = inventory.low_stock_count();
        if low == 0 {
            println!("Low stock items: {}", "0".success());
        } else {
            println!("Low stock items: {}", low.to_string().warning());
            println!("{}", "Restock items marked LOW.".dim());
        }
    }
}

fn status_label(item: &Item) -> &'static str {
    if item.is_low_stock() { "LOW" } else { "OK" }
}
