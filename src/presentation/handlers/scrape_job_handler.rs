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

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    application::ScrapeClient,
    domain::repositories::{
        scrape_job_repository::ScrapeJobRepository, scrape_url_repository::ScrapeUrlRepository,
    },
    presentation::errors::AppError,
    queue::publisher::QueuePublisher,
};

/// 时间范围查询参数
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Scrape job not found" })),
    )
        .into_response()
}

/// 创建新的抓取任务
pub async fn create_scrape_job<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    let job = client.create_scrape_job(&payload).await?;
    Ok((StatusCode::CREATED, Json(job)).into_response())
}

/// 按时间范围列出任务
pub async fn list_scrape_jobs<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    let jobs = client
        .get_scrape_jobs_by_date_range(
            query.start_date.as_deref().unwrap_or_default(),
            query.end_date.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(jobs).into_response())
}

/// 获取任务状态
pub async fn get_scrape_job<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    match client.get_scrape_job_status(&job_id).await? {
        Some(job) => Ok(Json(job).into_response()),
        None => Ok(not_found()),
    }
}

/// 获取任务每个URL的结果
pub async fn get_scrape_job_results<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    match client.get_scrape_job_url_results(&job_id).await? {
        Some(results) => Ok(Json(results).into_response()),
        None => Ok(not_found()),
    }
}

/// 获取已完成URL的结果路径
pub async fn get_scrape_result_paths<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    match client.get_scrape_result_paths(&job_id).await? {
        Some(paths) => Ok(Json(paths).into_response()),
        None => Ok(not_found()),
    }
}

/// 按 baseURL 列出任务
pub async fn list_scrape_jobs_by_base_url<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Path(base_url): Path<String>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    let jobs = client.get_scrape_jobs_by_base_url(&base_url, None).await?;
    Ok(Json(jobs).into_response())
}

/// 按 baseURL 与处理类型列出任务
pub async fn list_scrape_jobs_by_base_url_and_processing_type<J, U, Q>(
    Extension(client): Extension<Arc<ScrapeClient<J, U, Q>>>,
    Path((base_url, processing_type)): Path<(String, String)>,
) -> Result<Response, AppError>
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    let jobs = client
        .get_scrape_jobs_by_base_url(&base_url, Some(&processing_type))
        .await?;
    Ok(Json(jobs).into_response())
}
