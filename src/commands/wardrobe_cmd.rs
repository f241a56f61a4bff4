use clap::Args;

use wardrobe::models::default_wardrobe;

#[derive(Args)]
pub struct WardrobeCommand {}

impl WardrobeCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        for section in default_wardrobe() {
            println!("{}", section);
        }
        Ok(())
    }
}
