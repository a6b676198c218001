// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 创建 scrape_jobs 表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapeJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeJobs::BaseUrl).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::ProcessingType).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Options).json().not_null())
                    .col(ColumnDef::new(ScrapeJobs::CustomHeaders).json())
                    .col(ColumnDef::new(ScrapeJobs::UrlCount).integer().not_null().default(0))
                    .col(ColumnDef::new(ScrapeJobs::SuccessCount).integer().not_null().default(0))
                    .col(ColumnDef::new(ScrapeJobs::FailedCount).integer().not_null().default(0))
                    .col(ColumnDef::new(ScrapeJobs::RedirectCount).integer().not_null().default(0))
                    .col(ColumnDef::new(ScrapeJobs::Duration).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(ScrapeJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScrapeJobs::EndedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScrapeJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_base_url_processing_type")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::BaseUrl)
                    .col(ScrapeJobs::ProcessingType)
                    .col(ScrapeJobs::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_started_at")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::StartedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum ScrapeJobs {
    Table,
    Id,
    BaseUrl,
    ProcessingType,
    Status,
    Options,
    CustomHeaders,
    UrlCount,
    SuccessCount,
    FailedCount,
    RedirectCount,
    Duration,
    StartedAt,
    EndedAt,
    CreatedAt,
    UpdatedAt,
}
