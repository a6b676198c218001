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

use crate::domain::models::scrape_job::{
    NewScrapeJob, ScrapeJob, ScrapeJobStatus, ScrapeProcessingType,
};
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::infrastructure::database::entities::scrape_job as scrape_job_entity;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
pub struct ScrapeJobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeJobRepositoryImpl {
    /// 创建新的抓取任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的抓取任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 把 JSON 列还原为对象；`null` 视为缺省
pub(crate) fn json_object(
    value: Option<Value>,
    column: &str,
) -> Result<Option<Map<String, Value>>, RepositoryError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(RepositoryError::Corrupted(format!(
            "{} is not an object: {}",
            column, other
        ))),
    }
}

fn to_domain(m: scrape_job_entity::Model) -> Result<ScrapeJob, RepositoryError> {
    let status = m
        .status
        .parse::<ScrapeJobStatus>()
        .map_err(|_| RepositoryError::Corrupted(format!("Invalid scrape job status: {}", m.status)))?;
    let processing_type = m
        .processing_type
        .parse::<ScrapeProcessingType>()
        .map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

    Ok(ScrapeJob {
        id: m.id,
        base_url: m.base_url,
        processing_type,
        options: json_object(Some(m.options), "options")?.unwrap_or_default(),
        custom_headers: json_object(m.custom_headers, "custom_headers")?,
        url_count: m.url_count,
        status,
        success_count: m.success_count,
        failed_count: m.failed_count,
        redirect_count: m.redirect_count,
        duration: m.duration,
        started_at: m.started_at.into(),
        ended_at: m.ended_at.map(Into::into),
        created_at: m.created_at.into(),
        updated_at: m.updated_at.into(),
    })
}

fn to_domain_all(models: Vec<scrape_job_entity::Model>) -> Result<Vec<ScrapeJob>, RepositoryError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl ScrapeJobRepository for ScrapeJobRepositoryImpl {
    async fn create(&self, job: NewScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        // 毫秒精度，保证写入与读回的时间戳一致
        let now = Utc::now().trunc_subsecs(3);
        let job = job.into_job(Uuid::new_v4(), now);

        let model = scrape_job_entity::ActiveModel {
            id: Set(job.id),
            base_url: Set(job.base_url.clone()),
            processing_type: Set(job.processing_type.to_string()),
            status: Set(job.status.to_string()),
            options: Set(Value::Object(job.options.clone())),
            custom_headers: Set(job.custom_headers.clone().map(Value::Object)),
            url_count: Set(job.url_count),
            success_count: Set(job.success_count),
            failed_count: Set(job.failed_count),
            redirect_count: Set(job.redirect_count),
            duration: Set(job.duration),
            started_at: Set(job.started_at.into()),
            ended_at: Set(job.ended_at.map(Into::into)),
            created_at: Set(job.created_at.into()),
            updated_at: Set(job.updated_at.into()),
        };

        scrape_job_entity::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<ScrapeJob, RepositoryError> {
        let model = scrape_job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        to_domain(model)
    }

    async fn all_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScrapeJob>, RepositoryError> {
        let start: DateTimeWithTimeZone = start.into();
        let end: DateTimeWithTimeZone = end.into();
        let models = scrape_job_entity::Entity::find()
            .filter(scrape_job_entity::Column::StartedAt.between(start, end))
            .order_by_asc(scrape_job_entity::Column::StartedAt)
            .all(self.db.as_ref())
            .await?;
        to_domain_all(models)
    }

    async fn all_by_base_url(&self, base_url: &str) -> Result<Vec<ScrapeJob>, RepositoryError> {
        let models = scrape_job_entity::Entity::find()
            .filter(scrape_job_entity::Column::BaseUrl.eq(base_url))
            .order_by_asc(scrape_job_entity::Column::StartedAt)
            .all(self.db.as_ref())
            .await?;
        to_domain_all(models)
    }

    async fn all_by_base_url_and_processing_type(
        &self,
        base_url: &str,
        processing_type: ScrapeProcessingType,
    ) -> Result<Vec<ScrapeJob>, RepositoryError> {
        let models = scrape_job_entity::Entity::find()
            .filter(scrape_job_entity::Column::BaseUrl.eq(base_url))
            .filter(scrape_job_entity::Column::ProcessingType.eq(processing_type.as_str()))
            .order_by_asc(scrape_job_entity::Column::StartedAt)
            .all(self.db.as_ref())
            .await?;
        to_domain_all(models)
    }
}
