use clap::Args;

use wardrobe::config::Config;
use wardrobe::photos::PhotoSearchClient;

#[derive(Args)]
pub struct PhotosCommand {
    /// Search terms (defaults to the configured query)
    #[arg(long, short)]
    query: Option<String>,

    /// Results per page
    #[arg(long)]
    per_page: Option<u32>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,
}

impl PhotosCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let access_key = config.photos.access_key.clone().unwrap_or_default();
        let client = PhotoSearchClient::new(&config.photos.base_url, access_key);

        let query = self.query.as_deref().unwrap_or(&config.photos.query);
        let per_page = self.per_page.unwrap_or(config.photos.per_page);

        match client.search(query, per_page, self.page.max(1)).await {
            Ok(urls) => {
                for url in urls {
                    println!("{}", url);
                }
            }
            // The photo grid simply stays empty
            Err(e) => tracing::error!(error = %e, query, "Error fetching photos"),
        }
        Ok(())
    }
}
