use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::model::{ColorModel, Coordinates, Rgb, convert_all};
use crate::{Error, Result};

mod records;

/// Curated reference palettes that can be ranked against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Dataset {
    #[default]
    #[value(name = "sketch")]
    CopicSketch,
    #[value(name = "ciao")]
    CopicCiao,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::CopicSketch, Dataset::CopicCiao];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used on the command line and in preferences
    pub fn key(self) -> &'static str {
        match self {
            Dataset::CopicSketch => "sketch",
            Dataset::CopicCiao => "ciao",
        }
    }

    /// Product line name
    pub fn title(self) -> &'static str {
        match self {
            Dataset::CopicSketch => "Copic Sketch",
            Dataset::CopicCiao => "Copic Ciao",
        }
    }

    /// Parse a dataset key, ignoring case
    pub fn from_name(name: &str) -> Option<Dataset> {
        <Dataset as ValueEnum>::from_str(name.trim(), true).ok()
    }

    fn builtin_json(self) -> &'static str {
        match self {
            Dataset::CopicSketch => include_str!("../data/copic_sketch.json"),
            Dataset::CopicCiao => include_str!("../data/copic_ciao.json"),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A palette row; rows without a reference color are separators and never ranked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub id: String,
    pub name: String,
    pub reference_color: Option<Rgb>,
}

impl ColorEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        reference_color: Option<Rgb>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reference_color,
        }
    }

    pub fn is_rankable(&self) -> bool {
        self.reference_color.is_some()
    }
}

/// Ordered, immutable entries of one dataset with their coordinates in every model
#[derive(Debug, Clone, Default)]
pub struct Palette {
    entries: Vec<ColorEntry>,
    coordinates: Vec<Option<[Coordinates; 8]>>,
}

impl Palette {
    /// Build a palette, ids must be unique
    pub fn new(entries: Vec<ColorEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(Error::DuplicateEntryId {
                    id: entry.id.clone(),
                });
            }
        }
        let coordinates = entries
            .iter()
            .map(|entry| entry.reference_color.map(convert_all))
            .collect();
        Ok(Self {
            entries,
            coordinates,
        })
    }

    /// Load a palette from a JSON array of `{ id, name, hex, rgbv, rgb }` records
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(records::parse_records(json)?)
    }

    /// Load a palette from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// All entries in palette order, separators included
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a reference color
    pub fn rankable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_rankable()).count()
    }

    /// Coordinates of the entry at the specified position, if it has a reference color
    pub fn coordinates(&self, position: usize, model: ColorModel) -> Option<Coordinates> {
        self.coordinates
            .get(position)
            .copied()
            .flatten()
            .map(|all| all[model.index()])
    }

    /// Entries with a reference color, in palette order, with their coordinates in one model
    pub fn rankable(&self, model: ColorModel) -> impl Iterator<Item = (&ColorEntry, Coordinates)> {
        self.entries
            .iter()
            .zip(&self.coordinates)
            .filter_map(move |(entry, all)| all.as_ref().map(|all| (entry, all[model.index()])))
    }
}

/// One palette per dataset
#[derive(Debug, Clone, Default)]
pub struct PaletteIndex {
    palettes: [Palette; 2],
}

impl PaletteIndex {
    /// Load the palettes bundled with the crate
    pub fn builtin() -> Result<Self> {
        let mut index = Self::default();
        for dataset in Dataset::ALL {
            index.palettes[dataset.index()] = Palette::from_json(dataset.builtin_json())?;
        }
        Ok(index)
    }

    /// Replace the palette of one dataset
    pub fn with_palette(mut self, dataset: Dataset, palette: Palette) -> Self {
        self.palettes[dataset.index()] = palette;
        self
    }

    pub fn palette(&self, dataset: Dataset) -> &Palette {
        &self.palettes[dataset.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palettes_load() {
        let index = PaletteIndex::builtin().unwrap();
        for dataset in Dataset::ALL {
            let palette = index.palette(dataset);
            assert!(palette.rankable_count() > 0, "{dataset} has no colors");
            // Group separators are kept for display
            assert!(palette.rankable_count() < palette.len());
        }
    }

    #[test]
    fn test_coordinates_follow_entries() {
        let palette = Palette::new(vec![
            ColorEntry::new("sep", "Reds", None),
            ColorEntry::new("R1", "Red", Some([255, 0, 0])),
        ])
        .unwrap();
        assert_eq!(palette.coordinates(0, ColorModel::Rgb), None);
        let rgb = palette.coordinates(1, ColorModel::Rgb).unwrap();
        assert_eq!(rgb.as_slice(), &[255.0, 0.0, 0.0]);
        let cmyk = palette.coordinates(1, ColorModel::Cmyk).unwrap();
        assert_eq!(cmyk.arity(), 4);
        assert_eq!(palette.coordinates(2, ColorModel::Rgb), None);

        let rankable: Vec<_> = palette
            .rankable(ColorModel::Lab)
            .map(|(e, _)| e.id.as_str())
            .collect();
        assert_eq!(rankable, vec!["R1"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Palette::new(vec![
            ColorEntry::new("R1", "Red", Some([255, 0, 0])),
            ColorEntry::new("R1", "Also red", Some([250, 0, 0])),
        ]);
        assert!(matches!(result, Err(Error::DuplicateEntryId { id }) if id == "R1"));
    }

    #[test]
    fn test_dataset_names() {
        assert_eq!(Dataset::from_name("sketch"), Some(Dataset::CopicSketch));
        assert_eq!(Dataset::from_name("CIAO"), Some(Dataset::CopicCiao));
        assert_eq!(Dataset::from_name("prismacolor"), None);
        for dataset in Dataset::ALL {
            assert_eq!(Dataset::from_name(dataset.key()), Some(dataset));
        }
    }
}
