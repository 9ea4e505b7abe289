use super::Query;

/// Remembers the last query that produced a ranking
#[derive(Debug, Default)]
pub struct QueryMemo {
    last: Option<Query>,
}

impl QueryMemo {
    /// True when the query matches the last recorded one exactly
    pub fn should_skip(&self, key: &Query) -> bool {
        self.last.as_ref() == Some(key)
    }

    pub fn record(&mut self, key: Query) {
        self.last = Some(key);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
