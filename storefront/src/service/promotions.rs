use super::{owned, paths, require_amount, require_text, StoreError, StoreService};
use crate::model::{DiscountType, NewPromotion, Promotion, PromotionPatch};
use crate::persistence::ConnectionProvider;

const PROMOTION_PATHS: &[&str] = &[paths::ADMIN_PROMOTIONS];

fn validate_promotion(promotion: &Promotion) -> Result<(), StoreError> {
    require_text("promotion code", &promotion.code)?;
    require_amount("promotion value", promotion.value)?;
    if promotion.discount_type == DiscountType::Percentage && promotion.value > 100.0 {
        return Err(StoreError::Invalid(
            "percentage discount cannot exceed 100".to_string(),
        ));
    }
    Ok(())
}

impl<P: ConnectionProvider> StoreService<P> {
    pub async fn list_promotions(&self, session: Option<&str>) -> Result<Vec<Promotion>, StoreError> {
        self.authorize(session)?;
        Ok(self.store.get().await.promotions)
    }

    pub async fn create_promotion(
        &self,
        session: Option<&str>,
        input: NewPromotion,
    ) -> Result<Promotion, StoreError> {
        self.authorize(session)?;

        let mut promotion = input.into_promotion(self.ids.next().to_string());
        promotion.code = promotion.code.trim().to_string();
        validate_promotion(&promotion)?;

        let mut document = self.store.load_for_update().await?;
        if document
            .promotions
            .iter()
            .any(|p| p.code_matches(&promotion.code))
        {
            return Err(StoreError::Invalid(format!(
                "promotion code {} already exists",
                promotion.code
            )));
        }
        document.promotions.push(promotion.clone());
        self.commit(&document, owned(PROMOTION_PATHS)).await?;
        Ok(promotion)
    }

    pub async fn update_promotion(
        &self,
        session: Option<&str>,
        id: &str,
        patch: PromotionPatch,
    ) -> Result<Promotion, StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let promotion = document
            .promotions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("promotion", id))?;
        patch.apply(promotion);
        promotion.code = promotion.code.trim().to_string();
        validate_promotion(promotion)?;
        let updated = promotion.clone();

        self.commit(&document, owned(PROMOTION_PATHS)).await?;
        Ok(updated)
    }

    pub async fn set_promotion_active(
        &self,
        session: Option<&str>,
        id: &str,
        active: bool,
    ) -> Result<Promotion, StoreError> {
        self.update_promotion(
            session,
            id,
            PromotionPatch {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_promotion(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let before = document.promotions.len();
        document.promotions.retain(|p| p.id != id);
        if document.promotions.len() == before {
            return Err(StoreError::not_found("promotion", id));
        }

        self.commit(&document, owned(PROMOTION_PATHS)).await
    }
}
