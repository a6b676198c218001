// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{ScrapeJob, ScrapeJobStatus, ScrapeProcessingType};
use crate::domain::models::scrape_url::{ScrapeUrl, ScrapeUrlStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 抓取任务响应数据传输对象
///
/// 任务实体对外公开的 JSON 形态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJobDto {
    pub id: Uuid,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub processing_type: ScrapeProcessingType,
    pub options: Map<String, Value>,
    pub url_count: i32,
    pub status: ScrapeJobStatus,
    pub custom_headers: Option<Map<String, Value>>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// 运行时长（毫秒）
    pub duration: i64,
    pub success_count: i32,
    pub failed_count: i32,
    pub redirect_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScrapeJob> for ScrapeJobDto {
    fn from(job: ScrapeJob) -> Self {
        Self {
            id: job.id,
            base_url: job.base_url,
            processing_type: job.processing_type,
            options: job.options,
            url_count: job.url_count,
            status: job.status,
            custom_headers: job.custom_headers,
            started_at: job.started_at,
            ended_at: job.ended_at,
            duration: job.duration,
            success_count: job.success_count,
            failed_count: job.failed_count,
            redirect_count: job.redirect_count,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// 单个URL的抓取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeUrlResultDto {
    pub url: String,
    pub status: ScrapeUrlStatus,
    pub reason: Option<String>,
    pub path: Option<String>,
}

impl From<ScrapeUrl> for ScrapeUrlResultDto {
    fn from(url: ScrapeUrl) -> Self {
        Self {
            url: url.url,
            status: url.status,
            reason: url.reason,
            path: url.path,
        }
    }
}
