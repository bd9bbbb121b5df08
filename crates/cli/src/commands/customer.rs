use clap::{Args, Subcommand};
use storefront_app::{
    customers::CustomerState,
    routes::{Access, Route, guard},
};

use crate::shell::{Shell, Unused};

#[derive(Debug, Args)]
pub(crate) struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    /// Show the name orders are placed under
    Show,

    /// Set the name orders are placed under
    SetName {
        /// Customer name, 2 to 50 characters
        name: String,
    },

    /// Forget the customer name
    Clear,
}

pub(crate) async fn run(command: CustomerCommand, shell: &Shell) -> Result<(), String> {
    let mut session = shell.customer().await;

    match command.command {
        CustomerSubcommand::Show => match session.state() {
            CustomerState::Named(name) => println!("customer_name: {name}"),
            CustomerState::Loading | CustomerState::Anonymous => {
                println!("no customer name set");
            }
        },
        CustomerSubcommand::SetName { name } => {
            if guard(&Route::CustomerName, &Unused, &session) != Access::Allow {
                return Err(format!(
                    "customer name is already set to {}; run `storefront customer clear` first",
                    session.name().unwrap_or_default()
                ));
            }

            session
                .set_name(&name)
                .await
                .map_err(|error| format!("failed to set customer name: {error}"))?;
        }
        CustomerSubcommand::Clear => {
            session
                .clear()
                .await
                .map_err(|error| format!("failed to clear customer session: {error}"))?;
        }
    }

    Ok(())
}
