use std::fmt;
use std::rc::Rc;

use itertools::Itertools; // for sorted_by() iterator function

use crate::color_ops::to_hex;
use crate::dataset::{ColorEntry, Dataset, PaletteIndex};
use crate::distance::{distance, max_diff};
use crate::model::{ColorModel, Coordinates, Rgb, convert};

pub use memo::QueryMemo;

mod memo;

/// Everything that decides the outcome of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    pub rgb: Rgb,
    pub model: ColorModel,
    pub dataset: Dataset,
}

impl Query {
    pub fn new(rgb: Rgb, model: ColorModel, dataset: Dataset) -> Self {
        Self {
            rgb,
            model,
            dataset,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({},{},{}) in {}",
            self.model,
            to_hex(self.rgb),
            self.rgb[0],
            self.rgb[1],
            self.rgb[2],
            self.dataset
        )
    }
}

/// Knobs for how distances and similarities are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Round coordinates half up before measuring distances
    pub round_coordinates: bool,
    /// Keep similarity within 0-100%
    pub clamp_similarity: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            round_coordinates: true,
            clamp_similarity: false,
        }
    }
}

/// A palette entry with its distance from the query
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub entry: ColorEntry,
    /// Entry coordinates in the query model
    pub coordinates: Coordinates,
    /// Distance divided by the query's max difference
    pub normalized_distance: f64,
    similarity: f64,
}

impl RankedEntry {
    /// Similarity in percent, may be negative unless clamping is enabled
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Similarity with one decimal, like "97.3%"
    pub fn similarity_text(&self) -> String {
        format!("{:.1}%", self.similarity)
    }
}

/// Entries of one dataset ordered from most to least similar
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub query: Query,
    pub query_coordinates: Coordinates,
    pub max_diff: f64,
    pub entries: Vec<RankedEntry>,
}

/// Receives every freshly computed ranking
pub trait RankingObserver {
    fn ranking_changed(&mut self, ranking: &Ranking);
}

impl<F: FnMut(&Ranking)> RankingObserver for F {
    fn ranking_changed(&mut self, ranking: &Ranking) {
        self(ranking)
    }
}

/// Ranks palette entries by their distance from a query color
pub struct ColorMatcher {
    index: PaletteIndex,
    options: MatcherOptions,
    memo: QueryMemo,
    current: Option<Rc<Ranking>>,
    observers: Vec<Box<dyn RankingObserver>>,
    recomputations: usize,
}

impl ColorMatcher {
    pub fn new(index: PaletteIndex, options: MatcherOptions) -> Self {
        Self {
            index,
            options,
            memo: QueryMemo::default(),
            current: None,
            observers: Vec::new(),
            recomputations: 0,
        }
    }

    /// Register an observer, called only when a ranking is actually recomputed
    pub fn subscribe(&mut self, observer: impl RankingObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The last emitted ranking
    pub fn current(&self) -> Option<Rc<Ranking>> {
        self.current.clone()
    }

    /// How many times a ranking has been computed from scratch
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Forget the last query so the next call to [`ColorMatcher::rank`] recomputes
    pub fn invalidate(&mut self) {
        self.memo.reset();
    }

    /// Rank the query's dataset against the query color
    ///
    /// An unchanged query returns the previous ranking without recomputing or
    /// notifying observers.
    pub fn rank(&mut self, query: Query) -> Rc<Ranking> {
        if self.memo.should_skip(&query) {
            if let Some(current) = &self.current {
                return Rc::clone(current);
            }
        }
        let ranking = Rc::new(self.compute(query));
        self.recomputations += 1;
        self.memo.record(query);
        for observer in self.observers.iter_mut() {
            observer.ranking_changed(&ranking);
        }
        self.current = Some(Rc::clone(&ranking));
        ranking
    }

    fn compute(&self, query: Query) -> Ranking {
        let query_coordinates = self.prepare(convert(query.model, query.rgb));
        let max_diff = max_diff(&query_coordinates);
        let entries = self
            .index
            .palette(query.dataset)
            .rankable(query.model)
            .map(|(entry, coordinates)| {
                let coordinates = self.prepare(coordinates);
                let normalized_distance = distance(&query_coordinates, &coordinates) / max_diff;
                RankedEntry {
                    entry: entry.clone(),
                    coordinates,
                    normalized_distance,
                    similarity: similarity_percent(
                        normalized_distance,
                        self.options.clamp_similarity,
                    ),
                }
            })
            // Stable, so equally distant entries keep palette order
            .sorted_by(|a, b| a.normalized_distance.total_cmp(&b.normalized_distance))
            .collect();
        Ranking {
            query,
            query_coordinates,
            max_diff,
            entries,
        }
    }

    fn prepare(&self, coordinates: Coordinates) -> Coordinates {
        match self.options.round_coordinates {
            true => coordinates.rounded(),
            false => coordinates,
        }
    }
}

fn similarity_percent(normalized_distance: f64, clamp: bool) -> f64 {
    let similarity = (1.0 - normalized_distance) * 100.0;
    match clamp {
        true => similarity.clamp(0.0, 100.0),
        false => similarity,
    }
}
