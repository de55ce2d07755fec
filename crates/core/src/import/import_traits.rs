use async_trait::async_trait;

use super::import_model::{ImportConfig, ImportResult};
use crate::errors::Result;

#[async_trait]
pub trait ImportServiceTrait: Send + Sync {
    /// Imports every valid row of `content` as a transaction of `user_id`.
    ///
    /// Rejected rows are counted and reported, never raised. File-level
    /// problems and storage failures return `Err` and import nothing.
    async fn import_csv(
        &self,
        user_id: &str,
        content: &[u8],
        config: ImportConfig,
    ) -> Result<ImportResult>;
}
