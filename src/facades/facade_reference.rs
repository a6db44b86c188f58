use std::sync::Arc;

use log::trace;

use super::FacadeError;
use crate::connection::ConnectionSingleton;
use crate::platform::Reference;

/// Facade deriving the database and storage root references of a context.
///
/// Both operations wait for the connection (and therefore for authentication
/// to be dispatched) before deriving anything; the references themselves are
/// recomputed on every call.
#[derive(Clone)]
pub struct FacadeReference {
    connection: Arc<ConnectionSingleton>,
}

impl FacadeReference {
    pub fn new(connection: Arc<ConnectionSingleton>) -> Self {
        Self { connection }
    }

    /// Database reference at the configured `databaseRootKey`.
    pub async fn get_database_reference(&self) -> Result<Reference, FacadeError> {
        let handle = self.connection.get_connection().await?;
        let reference = handle.database(&handle.settings().database_root_key);
        trace!("derived {}", reference);
        Ok(reference)
    }

    /// Storage reference at the configured `storageBasePath`, or the root.
    pub async fn get_storage_reference(&self) -> Result<Reference, FacadeError> {
        let handle = self.connection.get_connection().await?;
        let base = handle.settings().storage_base_path.as_deref().unwrap_or("/");
        let reference = handle.storage(base);
        trace!("derived {}", reference);
        Ok(reference)
    }
}
