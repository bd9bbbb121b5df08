use clap::Args;
use jiff::Timestamp;
use storefront_app::{
    checkout::{CheckoutError, CheckoutForm},
    routes::Route,
};

use crate::shell::{Shell, Unused, admit};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Contact phone number (10 digits)
    #[arg(long)]
    phone: String,

    /// Contact email
    #[arg(long, default_value = "")]
    email: String,

    /// Instructions for the store
    #[arg(long, default_value = "")]
    notes: String,
}

pub(crate) async fn run(args: CheckoutArgs, shell: &Shell) -> Result<(), String> {
    let customer = shell.customer().await;

    admit(&Route::Checkout, &Unused, &customer)?;

    let form = CheckoutForm {
        phone: args.phone,
        email: args.email,
        notes: args.notes,
    };

    let mut cart = shell.cart();

    let order = shell
        .checkout()
        .place_order(
            &form,
            &customer,
            &mut cart,
            &shell.confirmations(),
            Timestamp::now(),
        )
        .await
        .map_err(|error| match error {
            CheckoutError::InvalidForm(errors) => errors
                .entries()
                .map(|field| format!("{}: {}", field.field, field.message))
                .collect::<Vec<_>>()
                .join("\n"),
            other => format!("checkout failed: {other}"),
        })?;

    println!("order_id: {}", order.id);
    println!("view it with: storefront order show {}", order.id);

    Ok(())
}
