use qp_core::Error;
use qp_pattern::IndexSet;

/// Supplies the set of indexes that actually exist.
///
/// Queried once per run, after patterns have been collected. A failure
/// aborts the run before anything is classified.
#[async_trait::async_trait]
pub trait Indexes: Send + Sync {
    async fn indexes(&self) -> Result<IndexSet, Error>;
}

/// A fixed index set is its own source.
#[async_trait::async_trait]
impl Indexes for IndexSet {
    async fn indexes(&self) -> Result<IndexSet, Error> {
        Ok(self.clone())
    }
}

#[async_trait::async_trait]
impl<T: Indexes + ?Sized> Indexes for std::sync::Arc<T> {
    async fn indexes(&self) -> Result<IndexSet, Error> {
        self.as_ref().indexes().await
    }
}
