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

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// 验证错误类型
///
/// 调用方输入不合法时产生，总是在任何 I/O 之前同步返回
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 请求体缺失或不是 JSON 对象
    #[error("Invalid request: missing application/json request data")]
    MissingRequestData,

    /// urls 缺失、不是数组或为空
    #[error("Invalid request: urls must be provided as a non-empty array")]
    EmptyUrls,

    /// URL 数量超过单个任务允许的上限
    #[error("Invalid request: number of URLs provided ({provided}) exceeds the maximum allowed ({max})")]
    TooManyUrls { provided: usize, max: usize },

    /// URL无效
    #[error("Invalid request: {0} is not a valid URL")]
    InvalidUrl(String),

    #[error("Invalid request: options must be an object")]
    OptionsNotObject,

    #[error("Invalid request: customHeaders must be an object")]
    CustomHeadersNotObject,

    #[error("Invalid request: auditData must be an object")]
    AuditDataNotObject,

    #[error("Invalid request: maxScrapeAge must be a non-negative number")]
    InvalidMaxScrapeAge,

    #[error("Invalid request: unknown processing type {0}")]
    UnknownProcessingType(String),

    /// 抓取选项不合法（未知键或类型错误）
    #[error("Invalid request: {0}")]
    InvalidOptions(String),

    #[error("Invalid request: startDate and endDate must be in ISO 8601 format")]
    InvalidDateRange,

    #[error("Invalid request: baseURL must be a valid URL")]
    InvalidBaseUrl,

    #[error("Job ID is required")]
    JobIdRequired,

    #[error("jobId must be a valid UUID")]
    InvalidJobId,
}

/// 检查字符串是否为合法的 http(s) URL
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

/// 检查字符串是否为严格的 ISO 8601 UTC 时间戳
///
/// 只接受 `YYYY-MM-DDTHH:mm:ss.sssZ` 形式，即解析后按毫秒精度重新格式化必须与原文一致
pub fn is_iso_date(candidate: &str) -> bool {
    match DateTime::parse_from_rfc3339(candidate) {
        Ok(parsed) => parsed.to_rfc3339_opts(SecondsFormat::Millis, true) == candidate,
        Err(_) => false,
    }
}

/// 解析任务ID
///
/// # 返回值
///
/// * `Ok(Uuid)` - 合法的UUID
/// * `Err(ValidationError::InvalidJobId)` - 格式错误
pub fn parse_job_id(job_id: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(job_id).map_err(|_| ValidationError::InvalidJobId)
}

/// 普通 JSON 对象（排除数组与 null）
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}
