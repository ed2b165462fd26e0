use crate::{abstract_trait::product::ProductQueryRepositoryTrait, model::product::Product};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                p.product_id,
                p.name,
                p.description,
                p.weight,
                p.price,
                p.quantity,
                p.sold,
                p.category_id,
                c.name AS category_name,
                p.seller_id,
                s.name AS seller_name,
                p.image_id,
                p.image_url,
                p.status,
                p.created_at,
                p.updated_at
            FROM products p
            LEFT JOIN categories c ON c.category_id = p.category_id
            LEFT JOIN sellers s ON s.seller_id = p.seller_id
            WHERE p.product_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }
}
