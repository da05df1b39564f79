//! Per-table sort state that survives dashboard re-renders

use ahash::AHashMap;
use std::fmt;

/// Stable key for per-chart state derived from `(dashboard_id, chart_id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartKey {
    pub dashboard_id: String,
    pub chart_id: String,
}

/// Tables are keyed the same way as charts
pub type TableId = ChartKey;

impl ChartKey {
    pub fn new(dashboard_id: impl Into<String>, chart_id: impl Into<String>) -> Self {
        Self {
            dashboard_id: dashboard_id.into(),
            chart_id: chart_id.into(),
        }
    }

    /// Prefix shared by every key of one dashboard
    pub fn dashboard_prefix(dashboard_id: &str) -> String {
        format!("{}-", dashboard_id)
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.dashboard_id, self.chart_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Asc
    }

    /// Parse `"asc"`/`"desc"`, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort column and direction for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// Sort state keyed by table, owned by one dashboard renderer.
///
/// Entries are created on first access and only change through [`SortStore::toggle`].
#[derive(Debug, Default)]
pub struct SortStore {
    states: AHashMap<TableId, SortState>,
}

impl SortStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing state for `table`, or insert `default` and return it
    pub fn get_or_init(&mut self, table: &TableId, default: impl FnOnce() -> SortState) -> &SortState {
        self.states.entry(table.clone()).or_insert_with(default)
    }

    pub fn get(&self, table: &TableId) -> Option<&SortState> {
        self.states.get(table)
    }

    /// Flip the direction of a known table, returning the new direction
    pub fn toggle(&mut self, table: &TableId) -> Option<SortDirection> {
        let state = self.states.get_mut(table)?;
        state.direction = state.direction.toggled();
        tracing::debug!("Sort for {} is now {}", table, state.direction.as_str());
        Some(state.direction)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = ChartKey::new("extraction", "top_files");
        assert_eq!(key.to_string(), "extraction-top_files");
        assert!(key.to_string().starts_with(&ChartKey::dashboard_prefix("extraction")));
    }

    #[test]
    fn test_get_or_init_keeps_existing_state() {
        let mut store = SortStore::new();
        let table = ChartKey::new("d", "t");

        let first = store.get_or_init(&table, || SortState::new("count", SortDirection::Desc)).clone();
        assert_eq!(first.key, "count");

        // A later default does not overwrite what is already stored
        let again = store.get_or_init(&table, || SortState::new("name", SortDirection::Asc)).clone();
        assert_eq!(again, first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let mut store = SortStore::new();
        let table = ChartKey::new("d", "t");
        assert_eq!(store.toggle(&table), None);

        store.get_or_init(&table, || SortState::new("count", SortDirection::Desc));
        assert_eq!(store.toggle(&table), Some(SortDirection::Asc));
        assert_eq!(store.get(&table).map(|s| s.direction), Some(SortDirection::Asc));
        assert_eq!(store.toggle(&table), Some(SortDirection::Desc));
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
    }
}
