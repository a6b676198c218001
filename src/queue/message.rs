// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::ScrapeProcessingType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 发往抓取 worker 队列的批次消息
///
/// 同一任务所有消息的 `batch` 按 `batch_offset` 排序后拼接，即为任务的完整 URL 列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeQueueMessage {
    pub processing_type: ScrapeProcessingType,
    pub job_id: Uuid,
    /// 本批次的 URL
    pub batch: Vec<String>,
    /// 本批次首个 URL 在任务 URL 列表中的下标
    pub batch_offset: usize,
    pub custom_headers: Option<Map<String, Value>>,
    pub options: Map<String, Value>,
    /// 可复用的已有抓取结果的最大年龄（小时），0 表示强制重新抓取
    pub max_scrape_age: f64,
    pub meta_data: Value,
}
