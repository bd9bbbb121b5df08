use std::io::{self, Write};

use clap::{Args, Subcommand};
use storefront::{format::format_currency, products::Product};
use storefront_app::catalog::{ProductQuery, distinct_categories};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::emit;
use crate::shell::Shell;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products
    List(ListProductsArgs),

    /// Show one product
    Show {
        /// Product identifier
        id: String,
    },
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Only this category ("all" lists every category)
    #[arg(long)]
    category: Option<String>,

    /// Text to search for in names and descriptions
    #[arg(long)]
    search: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<u32>,

    /// Page size
    #[arg(long)]
    limit: Option<u32>,
}

pub(crate) async fn run(command: ProductsCommand, shell: &Shell) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(args, shell).await,
        ProductsSubcommand::Show { id } => show(&id, shell).await,
    }
}

async fn list(args: ListProductsArgs, shell: &Shell) -> Result<(), String> {
    let products = shell
        .context
        .catalog
        .list_products(ProductQuery {
            category: args.category,
            search: args.search,
            page: args.page,
            limit: args.limit,
        })
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    emit(|out| write_products(out, &products))
}

async fn show(id: &str, shell: &Shell) -> Result<(), String> {
    let product = shell
        .context
        .catalog
        .get_product(id)
        .await
        .map_err(|error| format!("failed to load product {id}: {error}"))?;

    emit(|out| {
        writeln!(out, "product_id: {}", product.id)?;
        writeln!(out, "name: {}", product.name)?;

        if let Some(description) = &product.description {
            writeln!(out, "description: {description}")?;
        }

        writeln!(
            out,
            "price: {} / {}",
            format_currency(product.unit_price),
            product.unit
        )?;

        if let Some(category) = &product.category {
            writeln!(out, "category: {category}")?;
        }

        writeln!(out, "in_stock: {}", product.in_stock)?;
        writeln!(out, "max_quantity: {}", product.max_quantity)
    })
}

fn write_products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Category", "Price", "Max", "Stock"]);

    for product in products {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            product.category.clone().unwrap_or_default(),
            format!("{} / {}", format_currency(product.unit_price), product.unit),
            product.max_quantity.to_string(),
            if product.in_stock { "In stock" } else { "Out of stock" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Categories: {}", distinct_categories(products).join(", "))
}
