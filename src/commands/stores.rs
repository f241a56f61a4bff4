use clap::Args;

use super::OutputFormat;
use wardrobe::config::Config;
use wardrobe::models::MapRegion;
use wardrobe::places::PlaceSearchClient;

#[derive(Args)]
pub struct StoresCommand {
    /// What to search for, e.g. "vintage clothing"
    query: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl StoresCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let client = PlaceSearchClient::new(&config.places.base_url, config.places.limit)?;

        let places = match client.search(&self.query).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!(error = %e, query = %self.query, "Error searching for stores");
                Vec::new()
            }
        };
        let region = MapRegion::for_results(&places);

        match self.format {
            OutputFormat::Json => {
                let body = serde_json::json!({ "region": region, "places": places });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            OutputFormat::Text => {
                println!(
                    "Map centered on ({:.4}, {:.4}), span {}° x {}°",
                    region.center.latitude,
                    region.center.longitude,
                    region.latitude_delta,
                    region.longitude_delta
                );
                if places.is_empty() {
                    println!("No stores found");
                    return Ok(());
                }
                println!();
                for place in &places {
                    println!("{}", place);
                    if !place.address.is_empty() {
                        println!("  {}", place.address);
                    }
                }
            }
        }
        Ok(())
    }
}
