use itertools::Itertools; // for join() iterator function

use crate::matcher::{RankedEntry, Ranking};
use crate::model::{ColorModel, convert};

/// What to include when rendering a ranking
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    /// Maximum number of rows, all rows when unset
    pub limit: Option<usize>,
    /// Show coordinates in every model instead of only the ranking model
    pub all_models: bool,
}

/// Render a ranking as a plain text table, preceded by a line describing the query
pub fn render(ranking: &Ranking, options: &TableOptions) -> String {
    let active = ranking.query.model;
    let models = match options.all_models {
        true => ColorModel::ALL.to_vec(),
        false => vec![active],
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut header = vec!["ID".to_string(), "Name".to_string()];
    header.extend(models.iter().map(|model| model.name().to_string()));
    header.push("Similarity".to_string());
    rows.push(header);

    let limit = options.limit.unwrap_or(usize::MAX);
    for ranked in ranking.entries.iter().take(limit) {
        let mut row = vec![ranked.entry.id.clone(), ranked.entry.name.clone()];
        row.extend(models.iter().map(|model| coordinates_cell(ranked, *model, active)));
        row.push(ranked.similarity_text());
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            rows.iter()
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let mut lines = rows.iter().map(|row| {
        row.iter()
            .zip(&widths)
            .enumerate()
            .map(|(column, (cell, &width))| match column + 1 == columns {
                // Similarity is right aligned so the decimals line up
                true => format!("{cell:>width$}"),
                false => format!("{cell:<width$}"),
            })
            .join("  ")
            .trim_end()
            .to_string()
    });

    format!(
        "{}: {}\n{}\n",
        ranking.query,
        ranking.query_coordinates.display(),
        lines.join("\n")
    )
}

fn coordinates_cell(ranked: &RankedEntry, model: ColorModel, active: ColorModel) -> String {
    if model == active {
        return ranked.coordinates.display();
    }
    ranked
        .entry
        .reference_color
        .map(|rgb| convert(model, rgb).display())
        .unwrap_or_default()
}
