//! # Shop Commands
//!
//! The shop header printed on receipts and exports, and the list of shops
//! sharing one database.

use murick_core::ShopConfig;
use serde::Serialize;

use crate::cli::ShopCommand;
use crate::error::{ApiError, CliResult};
use crate::output::{key_values, CommandOutput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ShopView<'a> {
    shop_id: &'a str,
    #[serde(flatten)]
    config: &'a ShopConfig,
}

pub async fn run(state: &AppState, command: ShopCommand) -> CliResult<CommandOutput> {
    match command {
        ShopCommand::Show => {
            let shop = state.shops().snapshot(&state.shop_id).await?;
            show(&state.shop_id, &shop.config)
        }

        ShopCommand::Set {
            name,
            proprietor,
            contact,
            address,
            email,
        } => {
            if name.is_none()
                && proprietor.is_none()
                && contact.is_none()
                && address.is_none()
                && email.is_none()
            {
                return Err(ApiError::validation("Nothing to update"));
            }

            let current = state.shops().snapshot(&state.shop_id).await?.config;
            let merged = ShopConfig {
                shop_name: name.unwrap_or(current.shop_name),
                proprietor_name: proprietor.unwrap_or(current.proprietor_name),
                contact_number: contact.unwrap_or(current.contact_number),
                address: address.unwrap_or(current.address),
                // Some("") clears; normalisation in the core turns it into None.
                email: email.or(current.email),
            };

            let saved = state.shops().set_shop_config(&state.shop_id, merged).await?;
            show(&state.shop_id, &saved)
        }

        ShopCommand::List => {
            let shops = state.shops().list_shops().await?;
            let text = if shops.is_empty() {
                "No shops have data yet\n".to_string()
            } else {
                let mut text = String::new();
                for id in &shops {
                    let marker = if *id == state.shop_id { "*" } else { " " };
                    text.push_str(&format!("{} {}\n", marker, id));
                }
                text
            };
            CommandOutput::new(&shops, text)
        }
    }
}

fn show(shop_id: &str, config: &ShopConfig) -> CliResult<CommandOutput> {
    let text = key_values(&[
        ("Shop ID", shop_id.to_string()),
        ("Name", config.shop_name.clone()),
        ("Proprietor", config.proprietor_name.clone()),
        ("Contact", config.contact_number.clone()),
        ("Address", config.address.clone()),
        ("Email", config.email.clone().unwrap_or_default()),
    ]);
    CommandOutput::new(&ShopView { shop_id, config }, text)
}
