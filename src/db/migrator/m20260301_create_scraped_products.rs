use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapedProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapedProducts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapedProducts::BatchId).string().not_null())
                    .col(
                        ColumnDef::new(ScrapedProducts::SearchTerm)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScrapedProducts::Position).integer().not_null())
                    .col(ColumnDef::new(ScrapedProducts::ProductName).string().null())
                    .col(
                        ColumnDef::new(ScrapedProducts::ReviewsJson)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScrapedProducts::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraped_products_search_term")
                    .table(ScrapedProducts::Table)
                    .col(ScrapedProducts::SearchTerm)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraped_products_batch")
                    .table(ScrapedProducts::Table)
                    .col(ScrapedProducts::BatchId)
                    .col(ScrapedProducts::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapedProducts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapedProducts {
    Table,
    Id,
    BatchId,
    SearchTerm,
    Position,
    ProductName,
    ReviewsJson,
    CreatedAt,
}
