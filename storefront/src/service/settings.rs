use super::{owned, paths, require_text, StoreError, StoreService};
use crate::model::{Settings, SettingsPatch};
use crate::persistence::ConnectionProvider;

impl<P: ConnectionProvider> StoreService<P> {
    pub async fn get_settings(&self) -> Settings {
        self.store.get().await.settings
    }

    /// Shallow merge: each field present in `patch` replaces the stored one.
    pub async fn update_settings(
        &self,
        session: Option<&str>,
        patch: SettingsPatch,
    ) -> Result<Settings, StoreError> {
        self.authorize(session)?;
        if let Some(name) = &patch.store_name {
            require_text("store name", name)?;
        }

        let mut document = self.store.load_for_update().await?;
        patch.apply(&mut document.settings);
        let updated = document.settings.clone();

        self.commit(&document, owned(&[paths::HOME])).await?;
        tracing::info!("Store settings updated");
        Ok(updated)
    }
}
