use std::rc::Rc;

use crate::color_ops::parse_query;
use crate::dataset::Dataset;
use crate::matcher::{ColorMatcher, Query, Ranking, RankingObserver};
use crate::model::{ColorModel, Rgb};

pub use preferences::{
    DATASET_KEY, FilePreferences, MODEL_KEY, MemoryPreferences, PreferenceStore,
};

mod preferences;

/// Turns input and selection events into rankings
pub struct Session {
    matcher: ColorMatcher,
    preferences: Box<dyn PreferenceStore>,
    model: ColorModel,
    dataset: Dataset,
    rgb: Option<Rgb>,
    verbose: bool,
}

impl Session {
    /// Construct a session, restoring the model and dataset from preferences when possible
    pub fn new(
        matcher: ColorMatcher,
        preferences: Box<dyn PreferenceStore>,
        verbose: bool,
    ) -> Self {
        let model = restore(&*preferences, MODEL_KEY, ColorModel::from_name, verbose);
        let dataset = restore(&*preferences, DATASET_KEY, Dataset::from_name, verbose);
        Self {
            matcher,
            preferences,
            model: model.unwrap_or_default(),
            dataset: dataset.unwrap_or_default(),
            rgb: None,
            verbose,
        }
    }

    pub fn model(&self) -> ColorModel {
        self.model
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    /// Last accepted query color
    pub fn rgb(&self) -> Option<Rgb> {
        self.rgb
    }

    /// The ranking currently on display
    pub fn current(&self) -> Option<Rc<Ranking>> {
        self.matcher.current()
    }

    pub fn matcher(&self) -> &ColorMatcher {
        &self.matcher
    }

    pub fn subscribe(&mut self, observer: impl RankingObserver + 'static) {
        self.matcher.subscribe(observer);
    }

    /// Handle edited query text
    ///
    /// Text that does not parse is ignored: nothing changes and `None` is returned.
    pub fn input_changed(&mut self, text: &str) -> Option<Rc<Ranking>> {
        match parse_query(text) {
            Ok(rgb) => Some(self.set_color(rgb)),
            Err(e) => {
                if self.verbose {
                    println!("{:?}: ignored, {e}", text.trim());
                }
                None
            }
        }
    }

    /// Rank an already validated query color
    pub fn set_color(&mut self, rgb: Rgb) -> Rc<Ranking> {
        self.rgb = Some(rgb);
        self.refresh(rgb)
    }

    /// Handle a model selection, re-ranking if a color is known
    pub fn select_model(&mut self, model: ColorModel) -> Option<Rc<Ranking>> {
        self.model = model;
        let rgb = self.rgb;
        let ranking = rgb.map(|rgb| self.refresh(rgb));
        self.remember(MODEL_KEY, model.name());
        ranking
    }

    /// Handle a dataset selection, re-ranking against the new palette if a color is known
    pub fn select_dataset(&mut self, dataset: Dataset) -> Option<Rc<Ranking>> {
        if dataset != self.dataset {
            self.matcher.invalidate();
        }
        self.dataset = dataset;
        let rgb = self.rgb;
        let ranking = rgb.map(|rgb| self.refresh(rgb));
        self.remember(DATASET_KEY, dataset.key());
        ranking
    }

    /// Persist a selection, a store that fails to save leaves the session as it is
    fn remember(&mut self, key: &str, value: &str) {
        if let Err(e) = self.preferences.set(key, value) {
            if self.verbose {
                println!("preferences: could not save {key} {value:?}, {e}");
            }
        }
    }

    fn refresh(&mut self, rgb: Rgb) -> Rc<Ranking> {
        let query = Query::new(rgb, self.model, self.dataset);
        let before = self.matcher.recomputations();
        let ranking = self.matcher.rank(query);
        if self.verbose {
            match self.matcher.recomputations() == before {
                true => println!("{}: {query} unchanged", self.dataset),
                false => println!(
                    "{}: ranked {} colors for {query}",
                    self.dataset,
                    ranking.entries.len()
                ),
            }
        }
        ranking
    }
}

/// Read a selection from preferences, ignoring values that no longer parse
fn restore<T: std::fmt::Debug>(
    preferences: &dyn PreferenceStore,
    key: &str,
    parse: fn(&str) -> Option<T>,
    verbose: bool,
) -> Option<T> {
    let value = preferences.get(key)?;
    let parsed = parse(&value);
    if verbose {
        match &parsed {
            Some(selection) => println!("preferences: restored {key} {selection:?}"),
            None => println!("preferences: ignoring unknown {key} {value:?}"),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PaletteIndex;
    use crate::matcher::MatcherOptions;

    fn session(preferences: MemoryPreferences) -> Session {
        let index = PaletteIndex::builtin().unwrap();
        let matcher = ColorMatcher::new(index, MatcherOptions::default());
        Session::new(matcher, Box::new(preferences), false)
    }

    #[test]
    fn test_defaults_without_preferences() {
        let session = session(MemoryPreferences::default());
        assert_eq!(session.model(), ColorModel::Lab);
        assert_eq!(session.dataset(), Dataset::CopicSketch);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_selections_restored_from_preferences() {
        let mut preferences = MemoryPreferences::default();
        preferences.set(MODEL_KEY, "HWB").unwrap();
        preferences.set(DATASET_KEY, "ciao").unwrap();
        let session = session(preferences);
        assert_eq!(session.model(), ColorModel::Hwb);
        assert_eq!(session.dataset(), Dataset::CopicCiao);
    }

    #[test]
    fn test_unknown_preferences_are_ignored() {
        let mut preferences = MemoryPreferences::default();
        preferences.set(MODEL_KEY, "OKLAB").unwrap();
        let session = session(preferences);
        assert_eq!(session.model(), ColorModel::Lab);
    }

    #[test]
    fn test_malformed_input_changes_nothing() {
        let mut session = session(MemoryPreferences::default());
        let before = session.input_changed("100,200,100").unwrap();
        assert_eq!(session.input_changed("100,200"), None);
        assert_eq!(session.input_changed("#12345"), None);
        assert_eq!(session.rgb(), Some([100, 200, 100]));
        let after = session.current().unwrap();
        assert!(Rc::ptr_eq(&before, &after));
        assert_eq!(session.matcher().recomputations(), 1);
    }

    #[test]
    fn test_hex_input_matches_decimal_input() {
        let mut session = session(MemoryPreferences::default());
        let decimal = session.input_changed("100,200,100").unwrap();
        let hex = session.input_changed("#64C864").unwrap();
        assert!(Rc::ptr_eq(&decimal, &hex));
    }

    #[test]
    fn test_selection_changes_rerank() {
        let mut session = session(MemoryPreferences::default());
        assert_eq!(session.select_model(ColorModel::Rgb), None);
        session.input_changed("10,20,30").unwrap();

        let ranking = session.select_dataset(Dataset::CopicCiao).unwrap();
        assert_eq!(ranking.query.dataset, Dataset::CopicCiao);
        assert_eq!(ranking.query.model, ColorModel::Rgb);

        let ranking = session.select_model(ColorModel::Lch).unwrap();
        assert_eq!(ranking.query.model, ColorModel::Lch);
        assert_eq!(session.matcher().recomputations(), 3);
    }

    #[test]
    fn test_selections_are_saved() {
        let path = std::env::temp_dir().join(format!(
            "marker-match-session-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let index = PaletteIndex::builtin().unwrap();
        let matcher = ColorMatcher::new(index, MatcherOptions::default());
        let store = FilePreferences::open(&path).unwrap();
        let mut session = Session::new(matcher, Box::new(store), false);
        session.select_model(ColorModel::Hsv);
        session.select_dataset(Dataset::CopicCiao);

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get(MODEL_KEY).as_deref(), Some("HSV"));
        assert_eq!(reopened.get(DATASET_KEY).as_deref(), Some("ciao"));
        std::fs::remove_file(&path).unwrap();
    }

    struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> crate::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_failed_save_still_applies_selection() {
        let index = PaletteIndex::builtin().unwrap();
        let matcher = ColorMatcher::new(index, MatcherOptions::default());
        let mut session = Session::new(matcher, Box::new(BrokenPreferences), false);
        session.input_changed("100,200,100").unwrap();

        let ranking = session.select_model(ColorModel::Hsv).unwrap();
        assert_eq!(session.model(), ColorModel::Hsv);
        assert_eq!(ranking.query.model, ColorModel::Hsv);
        assert!(Rc::ptr_eq(&ranking, &session.current().unwrap()));

        let ranking = session.select_dataset(Dataset::CopicCiao).unwrap();
        assert_eq!(ranking.query.dataset, Dataset::CopicCiao);
        assert_eq!(session.matcher().recomputations(), 3);
    }
}
