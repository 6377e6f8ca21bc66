use crate::domain::model::{NewPerson, Person};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 逐筆讀取，回傳 `None` 代表來源已讀完
pub trait ItemReader: Send {
    type Item: Send;

    /// 在第一次讀取前開啟來源，預設不需開啟
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Self::Item>>;
}

/// 回傳 `None` 表示這筆記錄被過濾掉
pub trait ItemProcessor: Send + Sync {
    type Input: Send;
    type Output: Send + Sync;

    fn process(&self, item: Self::Input) -> Result<Option<Self::Output>>;
}

/// 一次寫入整個 chunk
#[async_trait]
pub trait ItemWriter: Send + Sync {
    type Item: Send + Sync;

    async fn write(&self, items: &[Self::Item]) -> Result<()>;
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    /// 以單一交易寫入，任何一筆失敗則整批回滾
    async fn save_all(&self, people: &[NewPerson]) -> Result<Vec<Person>>;
    async fn find_all(&self) -> Result<Vec<Person>>;
    async fn count(&self) -> Result<usize>;
}
