use super::{now_iso, owned, paths, require_amount, require_text, StoreError, StoreService};
use crate::model::{Category, CategoryPatch, NewCategory, NewProduct, Product, ProductPatch};
use crate::persistence::ConnectionProvider;

const PRODUCT_PATHS: &[&str] = &[paths::HOME, paths::SHOP, paths::ADMIN_PRODUCTS];
const CATEGORY_PATHS: &[&str] = &[paths::SHOP, paths::ADMIN_CATEGORIES];

fn validate_product_price(product: &Product) -> Result<(), StoreError> {
    require_amount("price", product.price)?;
    for variant in product.variants.iter().flatten() {
        require_amount("variant price", variant.price)?;
    }
    for flavor in product.flavors.iter().flatten() {
        require_amount("flavor price", flavor.price)?;
    }
    Ok(())
}

impl<P: ConnectionProvider> StoreService<P> {
    pub async fn list_products(&self) -> Vec<Product> {
        self.store.get().await.products
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        self.store
            .get()
            .await
            .products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    pub async fn create_product(
        &self,
        session: Option<&str>,
        input: NewProduct,
    ) -> Result<Product, StoreError> {
        self.authorize(session)?;
        require_text("product name", &input.name)?;

        let product = input.into_product(self.ids.next(), now_iso());
        validate_product_price(&product)?;

        let mut document = self.store.load_for_update().await?;
        document.products.push(product.clone());
        self.commit(&document, owned(PRODUCT_PATHS)).await?;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    /// Apply a partial update. Fields absent from `patch` keep their values.
    pub async fn update_product(
        &self,
        session: Option<&str>,
        id: i64,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        self.authorize(session)?;
        if let Some(name) = &patch.name {
            require_text("product name", name)?;
        }

        let mut document = self.store.load_for_update().await?;
        let product = document
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        patch.apply(product);
        validate_product_price(product)?;
        let updated = product.clone();

        self.commit(&document, owned(PRODUCT_PATHS)).await?;
        Ok(updated)
    }

    pub async fn delete_product(&self, session: Option<&str>, id: i64) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let before = document.products.len();
        document.products.retain(|p| p.id != id);
        if document.products.len() == before {
            return Err(StoreError::not_found("product", id));
        }

        self.commit(&document, owned(PRODUCT_PATHS)).await?;
        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        self.store.get().await.categories
    }

    pub async fn create_category(
        &self,
        session: Option<&str>,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        self.authorize(session)?;
        require_text("category name", &input.name)?;
        require_text("category slug", &input.slug)?;

        let category = Category {
            id: self.ids.next().to_string(),
            name: input.name,
            slug: input.slug,
            description: input.description,
        };

        let mut document = self.store.load_for_update().await?;
        document.categories.push(category.clone());
        self.commit(&document, owned(CATEGORY_PATHS)).await?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        session: Option<&str>,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, StoreError> {
        self.authorize(session)?;
        if let Some(name) = &patch.name {
            require_text("category name", name)?;
        }
        if let Some(slug) = &patch.slug {
            require_text("category slug", slug)?;
        }

        let mut document = self.store.load_for_update().await?;
        let category = document
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("category", id))?;
        patch.apply(category);
        let updated = category.clone();

        self.commit(&document, owned(CATEGORY_PATHS)).await?;
        Ok(updated)
    }

    /// Products keep their category names; they are free-form labels.
    pub async fn delete_category(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let before = document.categories.len();
        document.categories.retain(|c| c.id != id);
        if document.categories.len() == before {
            return Err(StoreError::not_found("category", id));
        }

        self.commit(&document, owned(CATEGORY_PATHS)).await
    }
}
