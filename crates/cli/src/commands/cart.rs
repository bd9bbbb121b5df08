use clap::{Args, Subcommand};
use storefront::{
    cart::{QuantityUpdate, write_cart_summary},
    products::Product,
};
use storefront_app::routes::Route;
use tracing::warn;

use super::emit;
use crate::shell::{Shell, Unused, admit};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show,

    /// Add a product to the cart
    Add {
        /// Product identifier
        product_id: String,

        /// Quantity to add
        #[arg(default_value = "1")]
        quantity: String,
    },

    /// Change the quantity of a line item; zero removes it
    Update {
        /// Product identifier
        product_id: String,

        /// New quantity
        quantity: String,
    },

    /// Remove a line item
    Remove {
        /// Product identifier
        product_id: String,
    },

    /// Empty the cart
    Clear,

    /// Refresh stock ceilings from the catalog and clamp quantities
    Reconcile,
}

pub(crate) async fn run(command: CartCommand, shell: &Shell) -> Result<(), String> {
    let customer = shell.customer().await;

    admit(&Route::Cart, &Unused, &customer)?;

    let mut cart = shell.cart();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add {
            product_id,
            quantity,
        } => {
            let product = shell
                .context
                .catalog
                .get_product(&product_id)
                .await
                .map_err(|error| format!("failed to load product {product_id}: {error}"))?;

            cart.add_item(&product, quantity.as_str())
                .map_err(|error| format!("failed to add {product_id} to cart: {error}"))?;
        }
        CartSubcommand::Update {
            product_id,
            quantity,
        } => {
            let update = cart
                .update_quantity(&product_id, quantity.as_str())
                .map_err(|error| format!("failed to update {product_id}: {error}"))?;

            if update == QuantityUpdate::Removed {
                println!("removed {product_id} from cart");
            }
        }
        CartSubcommand::Remove { product_id } => {
            if cart.remove_item(&product_id).is_none() {
                return Err(format!("{product_id} is not in the cart"));
            }
        }
        CartSubcommand::Clear => cart.clear(),
        CartSubcommand::Reconcile => {
            let mut products: Vec<Product> = Vec::with_capacity(cart.len());

            for item in cart.items() {
                match shell.context.catalog.get_product(&item.id).await {
                    Ok(product) => products.push(product),
                    Err(error) => warn!(%error, product = %item.id, "failed to refresh product"),
                }
            }

            let adjustments = cart.apply_stock_levels(&products);

            if adjustments.is_empty() {
                println!("cart is within stock limits");
            }
        }
    }

    emit(|out| write_cart_summary(out, cart.items(), cart.totals()))
}
