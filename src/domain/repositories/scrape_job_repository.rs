// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{NewScrapeJob, ScrapeJob, ScrapeProcessingType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Not found")]
    NotFound,
    /// 存储中的记录无法映射为领域对象
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

/// 抓取任务仓库特质
///
/// 定义任务数据访问接口。`find_by_id` 对不存在的记录返回
/// `RepositoryError::NotFound`，由监督器在边界处折叠为 `None`。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScrapeJobRepository: Send + Sync {
    /// 创建新任务并返回持久化后的记录
    async fn create(&self, job: NewScrapeJob) -> Result<ScrapeJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<ScrapeJob, RepositoryError>;
    /// 查找 `started_at` 落在区间内的全部任务
    async fn all_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScrapeJob>, RepositoryError>;
    /// 查找某个 baseURL 下的全部任务
    async fn all_by_base_url(&self, base_url: &str) -> Result<Vec<ScrapeJob>, RepositoryError>;
    /// 查找某个 baseURL 与处理类型下的全部任务
    async fn all_by_base_url_and_processing_type(
        &self,
        base_url: &str,
        processing_type: ScrapeProcessingType,
    ) -> Result<Vec<ScrapeJob>, RepositoryError>;
}
