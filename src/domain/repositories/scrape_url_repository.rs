// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::ScrapeProcessingType;
use crate::domain::models::scrape_url::ScrapeUrl;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 抓取 URL 记录仓库特质
///
/// 记录由外部 worker 写入，这里只暴露查询
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScrapeUrlRepository: Send + Sync {
    /// 查找某任务的全部 URL 记录
    async fn all_by_scrape_job_id(
        &self,
        scrape_job_id: Uuid,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError>;

    /// 查找近期的原始抓取记录
    ///
    /// 只返回 `is_original` 为 true、`created_at` 落在
    /// `[now - max_age_hours, now]` 内的记录
    async fn all_recent_by_url_and_processing_type(
        &self,
        url: &str,
        processing_type: ScrapeProcessingType,
        max_age_hours: f64,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError>;
}
