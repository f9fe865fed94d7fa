use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 url_mappings 表
        manager
            .create_table(
                Table::create()
                    .table(UrlMapping::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UrlMapping::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UrlMapping::ShortKey)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UrlMapping::LongUrl).text().not_null())
                    .col(
                        ColumnDef::new(UrlMapping::ClickCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UrlMapping::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UrlMapping::ExpireAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：short_key 的唯一性只由数据库保证
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_url_mappings_short_key")
                    .table(UrlMapping::Table)
                    .col(UrlMapping::ShortKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 索引：click_count（Top N 查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_url_mappings_click_count")
                    .table(UrlMapping::Table)
                    .col(UrlMapping::ClickCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_url_mappings_click_count")
                    .table(UrlMapping::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_url_mappings_short_key")
                    .table(UrlMapping::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UrlMapping::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UrlMapping {
    #[sea_orm(iden = "url_mappings")]
    Table,
    Id,
    ShortKey,
    LongUrl,
    ClickCount,
    CreatedAt,
    ExpireAt,
}
