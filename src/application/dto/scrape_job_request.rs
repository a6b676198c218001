// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::ScrapeProcessingType;
use crate::utils::validators::{is_plain_object, is_valid_url, ValidationError};
use serde_json::{Map, Value};

/// 未指定时可复用已有抓取结果的最大年龄（小时）
pub const DEFAULT_MAX_SCRAPE_AGE_HOURS: f64 = 24.0;

/// 创建抓取任务请求
///
/// 由原始 JSON 经 [`CreateScrapeJobRequest::parse`] 校验后得到
#[derive(Debug, Clone, PartialEq)]
pub struct CreateScrapeJobRequest {
    pub urls: Vec<String>,
    pub options: Map<String, Value>,
    pub custom_headers: Option<Map<String, Value>>,
    pub processing_type: ScrapeProcessingType,
    /// 0 表示强制重新抓取
    pub max_scrape_age: f64,
    pub audit_data: Value,
}

/// 取出可选字段，`null` 与缺省等价
fn optional<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|value| !value.is_null())
}

fn optional_object(
    data: &Map<String, Value>,
    key: &str,
    error: ValidationError,
) -> Result<Option<Map<String, Value>>, ValidationError> {
    match optional(data, key) {
        None => Ok(None),
        Some(value) if is_plain_object(value) => Ok(value.as_object().cloned()),
        Some(_) => Err(error),
    }
}

impl CreateScrapeJobRequest {
    /// 校验并解析请求体
    ///
    /// 校验顺序：请求体是对象；`urls` 为非空数组；数量不超过 `max_urls_per_job`；
    /// 每个元素都是合法URL；`options`/`customHeaders` 为对象
    ///
    /// # 参数
    ///
    /// * `data` - 原始请求体
    /// * `max_urls_per_job` - 单个任务的URL上限
    ///
    /// # 返回值
    ///
    /// * `Ok(CreateScrapeJobRequest)` - 合法请求，缺省字段已填充默认值
    /// * `Err(ValidationError)` - 第一个不合法的字段
    pub fn parse(data: &Value, max_urls_per_job: usize) -> Result<Self, ValidationError> {
        let data = data.as_object().ok_or(ValidationError::MissingRequestData)?;

        let urls = data
            .get("urls")
            .and_then(Value::as_array)
            .filter(|urls| !urls.is_empty())
            .ok_or(ValidationError::EmptyUrls)?;

        if urls.len() > max_urls_per_job {
            return Err(ValidationError::TooManyUrls {
                provided: urls.len(),
                max: max_urls_per_job,
            });
        }

        let urls = urls
            .iter()
            .map(|url| match url.as_str() {
                Some(url) if is_valid_url(url) => Ok(url.to_string()),
                Some(url) => Err(ValidationError::InvalidUrl(url.to_string())),
                None => Err(ValidationError::InvalidUrl(url.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let options = optional_object(data, "options", ValidationError::OptionsNotObject)?
            .unwrap_or_default();
        let custom_headers =
            optional_object(data, "customHeaders", ValidationError::CustomHeadersNotObject)?;

        let processing_type = match optional(data, "processingType") {
            None => ScrapeProcessingType::default(),
            Some(Value::String(tag)) => tag.parse()?,
            Some(other) => {
                return Err(ValidationError::UnknownProcessingType(other.to_string()));
            }
        };

        let max_scrape_age = match optional(data, "maxScrapeAge") {
            None => DEFAULT_MAX_SCRAPE_AGE_HOURS,
            Some(value) => value
                .as_f64()
                .filter(|age| *age >= 0.0)
                .ok_or(ValidationError::InvalidMaxScrapeAge)?,
        };

        let audit_data = optional_object(data, "auditData", ValidationError::AuditDataNotObject)?
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(Self {
            urls,
            options,
            custom_headers,
            processing_type,
            max_scrape_age,
            audit_data,
        })
    }
}
