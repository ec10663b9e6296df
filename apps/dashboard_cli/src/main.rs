use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, HttpProductClient, ListController, ListView, ProductPage, Severity,
};
use shared::domain::ProductField;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "dashboard_cli", about = "Manage products from the terminal")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the product table.
    List,
    /// Create a product. Omitted fields are sent as empty text or zero.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        qty: Option<String>,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Edit a product by its 1-based row number.
    Edit {
        row: usize,
        /// `field=value` using the backend field name, e.g. `harga_item=2500`.
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        assignments: Vec<(ProductField, String)>,
    },
    /// Delete a product by its 1-based row number.
    Delete { row: usize },
}

fn parse_assignment(raw: &str) -> Result<(ProductField, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let field = key.parse::<ProductField>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

fn row_index(row: usize) -> Result<usize> {
    if row == 0 {
        bail!("rows are numbered from 1");
    }
    Ok(row - 1)
}

fn print_table(list: &ListController) {
    match list.view() {
        ListView::Loading => println!("Loading..."),
        ListView::Failed(message) => println!("{message}"),
        ListView::Table(products) => {
            print!("{:>4}", "No");
            for field in ProductField::ALL {
                print!("  {:<20}", field.label());
            }
            println!();
            for (row, product) in products.iter().enumerate() {
                print!("{:>4}", row + 1);
                for field in ProductField::ALL {
                    print!("  {:<20}", product.get(field).to_string());
                }
                println!("  [{}]", product.id);
            }
        }
    }
}

fn print_notification(list: &ListController) {
    if let Some(notification) = list.notification() {
        match notification.severity {
            Severity::Success => println!("{}", notification.message),
            Severity::Error => eprintln!("{}", notification.message),
        }
    }
}

async fn run(page: &mut ProductPage, command: Command) -> Result<()> {
    match command {
        Command::List => {}
        Command::Add {
            name,
            category,
            price,
            qty,
            unit,
        } => {
            page.toggle_add_panel();
            let values = [
                (ProductField::Name, name),
                (ProductField::Category, category),
                (ProductField::Price, price),
                (ProductField::Quantity, qty),
                (ProductField::Unit, unit),
            ];
            for (field, value) in values {
                if let Some(value) = value {
                    page.set_draft_field(field, &value)?;
                }
            }
            let created = page.submit_draft().await?;
            tracing::debug!(product_id = %created.id, "created product");
        }
        Command::Edit { row, assignments } => {
            page.begin_edit(row_index(row)?)?;
            for (field, value) in assignments {
                page.set_field(field, &value)?;
            }
            page.save_row().await?;
        }
        Command::Delete { row } => {
            page.remove_row(row_index(row)?).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
        settings.validate()?;
    }
    if let Some(token) = cli.token {
        settings.access_token = Some(token);
    }

    let api = HttpProductClient::new(
        &settings.server_url,
        &settings.api_prefix,
        settings.credentials(),
    )
    .context("failed to build product client")?;
    let mut page = ProductPage::with_list(
        Arc::new(api),
        ListController::new(settings.notification_timeout()),
    );

    page.load().await?;
    let outcome = run(&mut page, cli.command).await;
    print_notification(page.list());
    print_table(page.list());
    outcome
}
