use crate::entities::{prelude::*, scraped_products};
use crate::models::{CacheEntry, ProductRecord};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;

pub struct ProductRepository {
    conn: DatabaseConnection,
}

/// Summary of one stored cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredBatch {
    pub batch_id: String,
    pub search_term: String,
    pub created_at: String,
    pub product_count: usize,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Appends `entry` as a new batch and returns its id. Earlier batches for
    /// the same term are left in place. An entry without products writes
    /// nothing and returns `None`.
    pub async fn insert_entry(&self, entry: &CacheEntry) -> Result<Option<String>> {
        if entry.is_empty() {
            return Ok(None);
        }

        let batch_id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        let rows = entry
            .products
            .iter()
            .enumerate()
            .map(|(position, tagged)| -> Result<scraped_products::ActiveModel> {
                Ok(scraped_products::ActiveModel {
                    batch_id: Set(batch_id.clone()),
                    search_term: Set(tagged.search_term.clone()),
                    position: Set(i32::try_from(position)?),
                    product_name: Set(tagged.product.name.clone()),
                    reviews_json: Set(serde_json::to_string(&tagged.product.reviews)?),
                    created_at: Set(created_at.clone()),
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ScrapedProducts::insert_many(rows).exec(&self.conn).await?;

        Ok(Some(batch_id))
    }

    /// Products of the most recently stored batch for `term`, in their
    /// original order. Empty when nothing is stored.
    pub async fn latest_for_term(&self, term: &str) -> Result<Vec<ProductRecord>> {
        let Some(newest) = ScrapedProducts::find()
            .filter(scraped_products::Column::SearchTerm.eq(term))
            .order_by_desc(scraped_products::Column::Id)
            .one(&self.conn)
            .await?
        else {
            return Ok(Vec::new());
        };

        let rows = ScrapedProducts::find()
            .filter(scraped_products::Column::SearchTerm.eq(term))
            .filter(scraped_products::Column::BatchId.eq(newest.batch_id))
            .order_by_asc(scraped_products::Column::Position)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(into_record).collect()
    }

    /// Stored batches for `term`, newest first.
    pub async fn batches_for_term(&self, term: &str, limit: u64) -> Result<Vec<StoredBatch>> {
        let rows = ScrapedProducts::find()
            .filter(scraped_products::Column::SearchTerm.eq(term))
            .order_by_desc(scraped_products::Column::Id)
            .all(&self.conn)
            .await?;

        let mut batches: Vec<StoredBatch> = Vec::new();
        for row in rows {
            if let Some(batch) = batches.iter_mut().find(|b| b.batch_id == row.batch_id) {
                batch.product_count += 1;
            } else {
                batches.push(StoredBatch {
                    batch_id: row.batch_id,
                    search_term: row.search_term,
                    created_at: row.created_at,
                    product_count: 1,
                });
            }
        }

        batches.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(batches)
    }
}

fn into_record(row: scraped_products::Model) -> Result<ProductRecord> {
    Ok(ProductRecord {
        name: row.product_name,
        reviews: serde_json::from_str(&row.reviews_json)?,
    })
}
