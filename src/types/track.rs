use std::path::Path;

/// Fixed, ordered list of track locators the player can switch between.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    locators: Vec<String>,
}

impl Playlist {
    pub fn new(locators: Vec<String>) -> Self {
        Playlist { locators }
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.locators.get(index).map(String::as_str)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.locators.len()
    }

    /// Short name for a track, the file name when the locator looks like a path.
    pub fn title(&self, index: usize) -> Option<String> {
        let locator = self.get(index)?;
        let name = locator.rsplit('/').next().unwrap_or(locator);
        let name = Path::new(name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| locator.to_string());
        Some(name)
    }
}
