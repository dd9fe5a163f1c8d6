use super::CatalogSource;
use crate::error::Result;
use async_trait::async_trait;
use verstage_index::models::SimplifiedIndex;

/// Serves a catalog that is already in memory, such as one the index
/// builder just produced.
pub struct StaticSource {
    index: SimplifiedIndex,
}

impl StaticSource {
    pub fn new(index: SimplifiedIndex) -> Self {
        Self { index }
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<SimplifiedIndex> {
        Ok(self.index.clone())
    }
}
