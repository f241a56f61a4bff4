use clap::{Args, Subcommand};
use std::sync::Arc;

use super::{confirm, require_session, OutputFormat};
use wardrobe::config::Config;
use wardrobe::models::ClothingItem;
use wardrobe::wishlist::{ItemStore, RemoteItemStore, WishlistSynchronizer};

#[derive(Args)]
pub struct WishlistCommand {
    #[command(subcommand)]
    pub command: WishlistSubcommand,
}

#[derive(Subcommand)]
pub enum WishlistSubcommand {
    /// Add an item to the wishlist
    Add {
        /// Name of the item
        name: String,

        /// Brand
        #[arg(long)]
        brand: String,

        /// Category, e.g. Coats
        #[arg(long, default_value = "")]
        category: String,

        /// Color
        #[arg(long, default_value = "")]
        color: String,

        /// Size
        #[arg(long, default_value = "")]
        size: String,

        /// Price; anything that is not a non-negative number is stored as 0
        #[arg(long, default_value = "")]
        price: String,

        /// Where to buy it
        #[arg(long, default_value = "")]
        location: String,

        /// Image URL
        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// List wishlist items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show an item's details
    Show {
        /// Item name
        name: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete an item by name
    Delete {
        /// Item name
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Adds the item and refetches. True only when the refreshed list holds more
/// items with that name than before, since duplicate names are allowed.
async fn add_and_refresh<S>(wishlist: &mut WishlistSynchronizer<S>, item: &ClothingItem) -> bool
where
    S: ItemStore + ?Sized + 'static,
{
    wishlist.fetch_all().await;
    let before = wishlist.count_named(&item.item_name);

    // Failures are logged by the synchronizer
    wishlist.add(item).await;
    wishlist.fetch_all().await;

    wishlist.count_named(&item.item_name) > before
}

impl WishlistCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let session = require_session(config)?;
        let store = RemoteItemStore::new(&config.server_url.value, &session.token);
        let mut wishlist = WishlistSynchronizer::new(Arc::new(store));

        match &self.command {
            WishlistSubcommand::Add {
                name,
                brand,
                category,
                color,
                size,
                price,
                location,
                image_url,
            } => {
                if name.trim().is_empty() || brand.trim().is_empty() {
                    return Err("Item name and brand cannot be empty".into());
                }

                let item = ClothingItem::new(name.trim(), brand.trim())
                    .with_category(category)
                    .with_color(color)
                    .with_size(size)
                    .with_price(ClothingItem::parse_price(price))
                    .with_location(location)
                    .with_image_url(image_url);

                if add_and_refresh(&mut wishlist, &item).await {
                    println!("Added to wishlist:");
                    println!("{}", item);
                } else {
                    println!("Item was not added. See the log for details.");
                }
                Ok(())
            }

            WishlistSubcommand::List { format } => {
                wishlist.fetch_all().await;
                let items = wishlist.items();

                if items.is_empty() {
                    println!("No items found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(items)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<30}  {:<20}  {:>10}", "NAME", "BRAND", "PRICE");
                        println!("{}", "-".repeat(64));
                        for item in items {
                            let name = if item.item_name.chars().count() > 30 {
                                let short: String = item.item_name.chars().take(27).collect();
                                format!("{}...", short)
                            } else {
                                item.item_name.clone()
                            };
                            println!("{:<30}  {:<20}  {:>10.2}", name, item.brand, item.price);
                        }
                        println!("\nTotal: {} item(s)", items.len());
                    }
                }
                Ok(())
            }

            WishlistSubcommand::Show { name, format } => {
                wishlist.fetch_all().await;

                match wishlist.find(name) {
                    Some(item) => {
                        match format {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(item)?);
                            }
                            OutputFormat::Text => {
                                println!("{}", item);
                            }
                        }
                        Ok(())
                    }
                    None => Err(format!("Item not found: {}", name).into()),
                }
            }

            WishlistSubcommand::Delete { name, force } => {
                wishlist.fetch_all().await;

                let item = match wishlist.find(name) {
                    Some(item) => item.clone(),
                    None => return Err(format!("Item not found: {}", name).into()),
                };

                // Confirm deletion unless --force is used
                if !force && !confirm(&format!("Delete '{}'?", item.item_name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let before = wishlist.items().len();
                wishlist.delete(&item).await;

                if wishlist.items().len() < before {
                    println!("Deleted: {}", item.item_name);
                } else {
                    println!("Item was not deleted. See the log for details.");
                }
                Ok(())
            }
        }
    }
}
