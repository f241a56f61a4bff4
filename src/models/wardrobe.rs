use serde::Serialize;
use std::fmt;

/// A titled row of wardrobe photos.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WardrobeSection {
    pub title: &'static str,
    pub photos: Vec<&'static str>,
}

impl WardrobeSection {
    fn new(title: &'static str, photos: &[&'static str]) -> Self {
        Self {
            title,
            photos: photos.to_vec(),
        }
    }
}

impl fmt::Display for WardrobeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for photo in &self.photos {
            writeln!(f, "  - {}", photo)?;
        }
        Ok(())
    }
}

/// The built-in wardrobe. Images are bundled assets, not user uploads.
pub fn default_wardrobe() -> Vec<WardrobeSection> {
    vec![
        WardrobeSection::new("Tops", &["Top1", "Top2", "Top3"]),
        WardrobeSection::new("Bottoms", &["Bottom1", "Bottom2", "Bottom3"]),
        WardrobeSection::new("Shoes", &["Shoes1", "Shoes2", "Shoes3"]),
    ]
}
