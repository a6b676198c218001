// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_scrape_jobs::ScrapeJobs;

/// 创建 scrape_urls 表
///
/// 每条记录对应某个任务中的一个 URL，由外部 worker 写入
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapeUrls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeUrls::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeUrls::ScrapeJobId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeUrls::Url).string().not_null())
                    .col(ColumnDef::new(ScrapeUrls::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeUrls::ProcessingType).string().not_null())
                    .col(ColumnDef::new(ScrapeUrls::Reason).text())
                    .col(ColumnDef::new(ScrapeUrls::Path).string())
                    .col(
                        ColumnDef::new(ScrapeUrls::IsOriginal)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScrapeUrls::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeUrls::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrape_urls_scrape_job_id")
                            .from(ScrapeUrls::Table, ScrapeUrls::ScrapeJobId)
                            .to(ScrapeJobs::Table, ScrapeJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_urls_scrape_job_id")
                    .table(ScrapeUrls::Table)
                    .col(ScrapeUrls::ScrapeJobId)
                    .to_owned(),
            )
            .await?;

        // access pattern: recent original scrapes of a url for a processing type
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_urls_url_processing_type_created_at")
                    .table(ScrapeUrls::Table)
                    .col(ScrapeUrls::Url)
                    .col(ScrapeUrls::ProcessingType)
                    .col(ScrapeUrls::IsOriginal)
                    .col(ScrapeUrls::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeUrls::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeUrls {
    Table,
    Id,
    ScrapeJobId,
    Url,
    Status,
    ProcessingType,
    Reason,
    Path,
    IsOriginal,
    CreatedAt,
    UpdatedAt,
}
