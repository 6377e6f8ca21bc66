use crate::domain::model::NewPerson;
use crate::domain::ports::{ItemWriter, PersonStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 把整個 chunk 交給 store 一次寫入
pub struct PersonItemWriter<S: PersonStore> {
    store: Arc<S>,
}

impl<S: PersonStore> PersonItemWriter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: PersonStore> ItemWriter for PersonItemWriter<S> {
    type Item = NewPerson;

    async fn write(&self, items: &[NewPerson]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let saved = self.store.save_all(items).await?;
        tracing::debug!(
            "Persisted {} people (ids {}..={})",
            saved.len(),
            saved.first().map(|p| p.id).unwrap_or_default(),
            saved.last().map(|p| p.id).unwrap_or_default()
        );
        Ok(())
    }
}
