use sea_orm::entity::prelude::*;

/// One product from one stored scrape. Rows sharing a `batch_id` form a
/// single cache entry; `position` keeps link discovery order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scraped_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub batch_id: String,
    pub search_term: String,
    pub position: i32,
    pub product_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub reviews_json: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
