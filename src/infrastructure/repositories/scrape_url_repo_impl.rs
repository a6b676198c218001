// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::scrape_job::ScrapeProcessingType;
use crate::domain::models::scrape_url::{recent_window, ScrapeUrl, ScrapeUrlStatus};
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::domain::repositories::scrape_url_repository::ScrapeUrlRepository;
use crate::infrastructure::database::entities::scrape_url as scrape_url_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 抓取 URL 记录仓库实现
pub struct ScrapeUrlRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeUrlRepositoryImpl {
    /// 创建新的抓取 URL 仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: scrape_url_entity::Model) -> Result<ScrapeUrl, RepositoryError> {
    let status = m
        .status
        .parse::<ScrapeUrlStatus>()
        .map_err(|_| RepositoryError::Corrupted(format!("Invalid scrape url status: {}", m.status)))?;
    let processing_type = m
        .processing_type
        .parse::<ScrapeProcessingType>()
        .map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

    Ok(ScrapeUrl {
        id: m.id,
        scrape_job_id: m.scrape_job_id,
        url: m.url,
        status,
        processing_type,
        reason: m.reason,
        path: m.path,
        is_original: m.is_original,
        created_at: m.created_at.into(),
        updated_at: m.updated_at.into(),
    })
}

#[async_trait]
impl ScrapeUrlRepository for ScrapeUrlRepositoryImpl {
    async fn all_by_scrape_job_id(
        &self,
        scrape_job_id: Uuid,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError> {
        let models = scrape_url_entity::Entity::find()
            .filter(scrape_url_entity::Column::ScrapeJobId.eq(scrape_job_id))
            .order_by_asc(scrape_url_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(to_domain).collect()
    }

    async fn all_recent_by_url_and_processing_type(
        &self,
        url: &str,
        processing_type: ScrapeProcessingType,
        max_age_hours: f64,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError> {
        let (start, end) = recent_window(Utc::now(), max_age_hours);
        let start: DateTimeWithTimeZone = start.into();
        let end: DateTimeWithTimeZone = end.into();

        let models = scrape_url_entity::Entity::find()
            .filter(scrape_url_entity::Column::Url.eq(url))
            .filter(scrape_url_entity::Column::ProcessingType.eq(processing_type.as_str()))
            .filter(scrape_url_entity::Column::IsOriginal.eq(true))
            .filter(scrape_url_entity::Column::CreatedAt.between(start, end))
            .order_by_desc(scrape_url_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(to_domain).collect()
    }
}
