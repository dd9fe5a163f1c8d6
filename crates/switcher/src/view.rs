/// A rendering of the switcher's state, rebuilt after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Trigger text: the display label of the current version.
    pub label: String,
    pub open: bool,
    pub query: String,
    /// Entries matching the query, in catalog order.
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub version: String,
    pub clean_version: String,
    pub build_date: Option<String>,
    pub path: String,
    pub current: bool,
    pub latest: bool,
}

impl View {
    /// Nothing matched the query.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
