use super::{now_iso, paths, require_text, StoreError, StoreService};
use crate::model::{NewPage, Page, PagePatch};
use crate::persistence::ConnectionProvider;

fn page_paths(slug: &str) -> Vec<String> {
    vec![paths::ADMIN_PAGES.to_string(), paths::legal(slug)]
}

fn validate_slug(slug: &str) -> Result<(), StoreError> {
    require_text("slug", slug)?;
    let valid = slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid {
        return Err(StoreError::Invalid(
            "slug may only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    Ok(())
}

impl<P: ConnectionProvider> StoreService<P> {
    pub async fn list_pages(&self) -> Vec<Page> {
        self.store.get().await.pages
    }

    pub async fn get_page(&self, slug: &str) -> Result<Page, StoreError> {
        self.store
            .get()
            .await
            .pages
            .into_iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| StoreError::not_found("page", slug))
    }

    pub async fn create_page(&self, session: Option<&str>, input: NewPage) -> Result<Page, StoreError> {
        self.authorize(session)?;
        validate_slug(&input.slug)?;
        require_text("title", &input.title)?;

        let mut document = self.store.load_for_update().await?;
        if document.pages.iter().any(|p| p.slug == input.slug) {
            return Err(StoreError::Invalid(format!(
                "a page with slug {} already exists",
                input.slug
            )));
        }

        let page = Page {
            id: self.ids.next().to_string(),
            slug: input.slug,
            title: input.title,
            content: input.content,
            last_updated: now_iso(),
        };
        document.pages.push(page.clone());
        self.commit(&document, page_paths(&page.slug)).await?;
        Ok(page)
    }

    /// Replace a page's title and content, stamping `lastUpdated`.
    pub async fn update_page(
        &self,
        session: Option<&str>,
        id: &str,
        patch: PagePatch,
    ) -> Result<Page, StoreError> {
        self.authorize(session)?;
        require_text("title", &patch.title)?;

        let mut document = self.store.load_for_update().await?;
        let page = document
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("page", id))?;
        page.title = patch.title;
        page.content = patch.content;
        page.last_updated = now_iso();
        let updated = page.clone();

        self.commit(&document, page_paths(&updated.slug)).await?;
        Ok(updated)
    }

    pub async fn delete_page(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let index = document
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("page", id))?;
        let removed = document.pages.remove(index);

        self.commit(&document, page_paths(&removed.slug)).await
    }
}
