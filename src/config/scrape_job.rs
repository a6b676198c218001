// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;
use validator::{Validate, ValidationErrors};

use crate::domain::models::scrape_job::scrape_options;
use crate::queue::batch::DEFAULT_BATCH_SIZE;
use crate::utils::validators::is_valid_url;

/// 未配置时单个任务允许的URL数量
pub const DEFAULT_MAX_URLS_PER_JOB: usize = 1;

/// 读取抓取任务配置的环境变量名
pub const SCRAPE_JOB_CONFIGURATION_ENV: &str = "SCRAPE_JOB_CONFIGURATION";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// 字段校验失败
    #[error("Invalid scrape configuration: {0}")]
    Invalid(String),

    /// JSON 解析失败
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("{} is not set", SCRAPE_JOB_CONFIGURATION_ENV)]
    Missing,

    /// 加载阶段的任意失败
    #[error("Invalid scrape job configuration: {0}")]
    Load(Box<ConfigurationError>),
}

/// 抓取任务配置
///
/// 进程启动时从 JSON 解析并校验一次，之后以只读方式共享给客户端与监督器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJobConfiguration {
    /// 工作队列地址
    #[serde(default)]
    #[validate(custom(function = "validate_worker_queue"))]
    pub scrape_worker_queue: String,

    /// 抓取结果存储桶
    #[serde(default)]
    #[validate(custom(function = "validate_s3_bucket"))]
    pub s3_bucket: String,

    /// 服务级默认抓取选项
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[validate(custom(function = "validate_default_options"))]
    pub options: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "maxUrlsPerJob must be a positive integer no greater than 2147483647"
    ))]
    pub max_urls_per_job: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "maxUrlsPerMessage must be a positive integer"))]
    pub max_urls_per_message: Option<i64>,
}

/// 报告首个错误时的字段顺序
const FIELD_ORDER: [(&str, &str); 5] = [
    ("scrape_worker_queue", "scrapeWorkerQueue"),
    ("s3_bucket", "s3Bucket"),
    ("options", "options"),
    ("max_urls_per_job", "maxUrlsPerJob"),
    ("max_urls_per_message", "maxUrlsPerMessage"),
];

fn invalid(message: &'static str) -> validator::ValidationError {
    validator::ValidationError::new("invalid").with_message(message.into())
}

fn validate_worker_queue(queue: &str) -> Result<(), validator::ValidationError> {
    if queue.trim().is_empty() {
        return Err(invalid("scrapeWorkerQueue must be a non-empty string"));
    }
    if !is_valid_url(queue) {
        return Err(invalid("scrapeWorkerQueue must be a valid URL"));
    }
    Ok(())
}

fn validate_s3_bucket(bucket: &str) -> Result<(), validator::ValidationError> {
    if bucket.trim().is_empty() {
        return Err(invalid("s3Bucket must be a non-empty string"));
    }
    Ok(())
}

fn validate_default_options(options: &Value) -> Result<(), validator::ValidationError> {
    if options.is_null() {
        return Ok(());
    }
    let Some(options) = options.as_object() else {
        return Err(invalid("options must be an object"));
    };
    let is_bool_or_absent = |key: &str| options.get(key).map_or(true, Value::is_boolean);
    if !is_bool_or_absent(scrape_options::ENABLE_JAVASCRIPT) {
        return Err(invalid("options.enableJavascript must be a boolean"));
    }
    if !is_bool_or_absent(scrape_options::HIDE_CONSENT_BANNERS) {
        return Err(invalid("options.hideConsentBanners must be a boolean"));
    }
    Ok(())
}

/// 取出字段顺序上的第一条错误信息
fn first_error_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let ordered = FIELD_ORDER.iter().find_map(|(rust_name, json_name)| {
        field_errors
            .get(*rust_name)
            .or_else(|| field_errors.get(*json_name))
            .and_then(|errs| errs.first())
    });
    ordered
        .and_then(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

impl ScrapeJobConfiguration {
    /// 解析并校验配置 JSON
    ///
    /// # 参数
    ///
    /// * `raw` - JSON 文本
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJobConfiguration)` - 合法配置
    /// * `Err(ConfigurationError)` - JSON 无法解析或字段不合法
    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(ConfigurationError::Invalid(
                "configuration must be an object".to_string(),
            ));
        }
        let configuration: ScrapeJobConfiguration = serde_json::from_value(value)?;
        configuration
            .validate()
            .map_err(|errors| ConfigurationError::Invalid(first_error_message(&errors)))?;
        Ok(configuration)
    }

    /// 加载抓取任务配置
    ///
    /// 优先使用显式传入的 JSON，否则读取 `SCRAPE_JOB_CONFIGURATION` 环境变量；
    /// 失败时记录日志并返回 `ConfigurationError::Load`
    pub fn load(raw: Option<&str>) -> Result<Self, ConfigurationError> {
        let raw = match raw {
            Some(raw) => Ok(raw.to_string()),
            None => std::env::var(SCRAPE_JOB_CONFIGURATION_ENV).map_err(|_| ConfigurationError::Missing),
        };
        raw.and_then(|raw| Self::from_json(&raw)).map_err(|e| {
            error!("Failed to parse or validate scrape job configuration: {}", e);
            ConfigurationError::Load(Box::new(e))
        })
    }

    /// 单个任务允许的最大URL数
    pub fn max_urls_per_job(&self) -> usize {
        self.max_urls_per_job
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_URLS_PER_JOB)
    }

    /// 单条队列消息允许的最大URL数
    pub fn max_urls_per_message(&self) -> usize {
        self.max_urls_per_message
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// 服务级默认选项，未配置时为空
    pub fn default_options(&self) -> Map<String, Value> {
        self.options.as_object().cloned().unwrap_or_default()
    }
}
