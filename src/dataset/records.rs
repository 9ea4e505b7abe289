use serde::Deserialize;

use super::ColorEntry;
use crate::{Error, Result};

/// One row of a palette file
///
/// Only `id`, `name` and `rgbv` are used; `hex` and `rgb` are display hints
/// for other tools and are ignored here.
#[derive(Debug, Deserialize)]
pub(crate) struct PaletteRecord {
    id: String,
    name: String,
    #[serde(default)]
    rgbv: Option<Vec<String>>,
}

impl PaletteRecord {
    /// Convert into an entry, rows without (or with an empty) `rgbv` become placeholders
    pub(crate) fn into_entry(self) -> Result<ColorEntry> {
        let reference_color = match self.rgbv.as_deref() {
            None | Some([]) => None,
            Some([r, g, b]) => Some([
                parse_channel(&self.id, r)?,
                parse_channel(&self.id, g)?,
                parse_channel(&self.id, b)?,
            ]),
            Some(other) => {
                return Err(Error::InvalidReferenceColor {
                    id: self.id,
                    value: other.join(","),
                });
            }
        };
        Ok(ColorEntry::new(self.id, self.name, reference_color))
    }
}

/// Parse every record in a JSON array of palette rows
pub(crate) fn parse_records(json: &str) -> Result<Vec<ColorEntry>> {
    let records: Vec<PaletteRecord> = serde_json::from_str(json)?;
    records.into_iter().map(PaletteRecord::into_entry).collect()
}

fn parse_channel(id: &str, value: &str) -> Result<u8> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| Error::InvalidReferenceColor {
            id: id.to_string(),
            value: value.to_string(),
        })
}
