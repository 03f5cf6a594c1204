use super::{now_iso, owned, paths, require_text, StoreError, StoreService};
use crate::model::{NewReview, Review, ReviewStatus};
use crate::persistence::ConnectionProvider;

impl<P: ConnectionProvider> StoreService<P> {
    /// Submit a review. It stays hidden until approved, so nothing is
    /// invalidated.
    pub async fn add_review(&self, input: NewReview) -> Result<Review, StoreError> {
        require_text("name", &input.user_name)?;
        if !(1..=5).contains(&input.rating) {
            return Err(StoreError::Invalid(
                "rating must be between 1 and 5".to_string(),
            ));
        }

        let mut document = self.store.load_for_update().await?;
        if !document.products.iter().any(|p| p.id == input.product_id) {
            return Err(StoreError::not_found("product", input.product_id));
        }

        let review = Review {
            id: self.ids.next().to_string(),
            product_id: input.product_id,
            user_name: input.user_name.trim().to_string(),
            rating: input.rating,
            comment: input.comment,
            date: now_iso(),
            status: ReviewStatus::Pending,
        };
        document.reviews.push(review.clone());
        self.commit(&document, Vec::new()).await?;

        tracing::info!(review_id = %review.id, product_id = review.product_id, "Review submitted");
        Ok(review)
    }

    /// Approved reviews for one product.
    pub async fn list_product_reviews(&self, product_id: i64) -> Vec<Review> {
        self.store
            .get()
            .await
            .reviews
            .into_iter()
            .filter(|r| r.product_id == product_id && r.status == ReviewStatus::Approved)
            .collect()
    }

    /// Every review regardless of status, for moderation.
    pub async fn list_reviews(&self, session: Option<&str>) -> Result<Vec<Review>, StoreError> {
        self.authorize(session)?;
        Ok(self.store.get().await.reviews)
    }

    pub async fn update_review_status(
        &self,
        session: Option<&str>,
        id: &str,
        status: ReviewStatus,
    ) -> Result<Review, StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let review = document
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("review", id))?;
        review.status = status;
        let updated = review.clone();

        self.commit(
            &document,
            vec![
                paths::ADMIN_REVIEWS.to_string(),
                paths::SHOP.to_string(),
                paths::product(updated.product_id),
            ],
        )
        .await?;
        Ok(updated)
    }

    pub async fn delete_review(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let index = document
            .reviews
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("review", id))?;
        let removed = document.reviews.remove(index);

        let mut affected = owned(&[paths::ADMIN_REVIEWS]);
        affected.push(paths::product(removed.product_id));
        self.commit(&document, affected).await
    }
}
