// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::validators::ValidationError;

/// 抓取任务实体
///
/// 一次批量抓取请求对应一条任务记录。任务由监督器创建并置为 `Running`，
/// 之后只有外部 worker 会修改它（计数、结束时间、终态）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 由首个 URL 推导出的 `scheme://host`
    pub base_url: String,
    /// 处理类型，决定 worker 使用的抓取模板
    pub processing_type: ScrapeProcessingType,
    /// 合并后的抓取选项（服务默认值 + 调用方覆盖）
    pub options: Map<String, Value>,
    /// 转发给 worker 的自定义HTTP请求头
    pub custom_headers: Option<Map<String, Value>>,
    /// 请求的 URL 总数
    pub url_count: i32,
    /// 任务状态
    pub status: ScrapeJobStatus,
    pub success_count: i32,
    pub failed_count: i32,
    pub redirect_count: i32,
    /// 运行时长（毫秒）
    pub duration: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待持久化的新任务数据
///
/// 由监督器构造并交给任务仓库；ID 与时间戳由仓库在写入时生成
#[derive(Debug, Clone, PartialEq)]
pub struct NewScrapeJob {
    pub base_url: String,
    pub processing_type: ScrapeProcessingType,
    pub options: Map<String, Value>,
    pub custom_headers: Option<Map<String, Value>>,
    pub url_count: i32,
    pub status: ScrapeJobStatus,
}

impl NewScrapeJob {
    /// 生成完整的任务实体
    ///
    /// # 参数
    ///
    /// * `id` - 新任务ID
    /// * `now` - 创建时间，同时用作 `started_at`
    pub fn into_job(self, id: Uuid, now: DateTime<Utc>) -> ScrapeJob {
        ScrapeJob {
            id,
            base_url: self.base_url,
            processing_type: self.processing_type,
            options: self.options,
            custom_headers: self.custom_headers,
            url_count: self.url_count,
            status: self.status,
            success_count: 0,
            failed_count: 0,
            redirect_count: 0,
            duration: 0,
            started_at: now,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 任务状态枚举
///
/// 监督器只会写入 `Running`；其余终态由外部 worker 设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapeJobStatus {
    #[default]
    Running,
    Complete,
    Failed,
    Stopped,
}

impl fmt::Display for ScrapeJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrapeJobStatus::Running => write!(f, "RUNNING"),
            ScrapeJobStatus::Complete => write!(f, "COMPLETE"),
            ScrapeJobStatus::Failed => write!(f, "FAILED"),
            ScrapeJobStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

impl FromStr for ScrapeJobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(ScrapeJobStatus::Running),
            "COMPLETE" => Ok(ScrapeJobStatus::Complete),
            "FAILED" => Ok(ScrapeJobStatus::Failed),
            "STOPPED" => Ok(ScrapeJobStatus::Stopped),
            _ => Err(()),
        }
    }
}

/// 处理类型枚举
///
/// 选择 worker 端的抓取行为/模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeProcessingType {
    /// 默认抓取
    #[default]
    Default,
    /// 可访问性审计抓取
    Accessibility,
    /// 表单抓取
    Form,
}

impl ScrapeProcessingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeProcessingType::Default => "default",
            ScrapeProcessingType::Accessibility => "accessibility",
            ScrapeProcessingType::Form => "form",
        }
    }
}

impl fmt::Display for ScrapeProcessingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeProcessingType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(ScrapeProcessingType::Default),
            "accessibility" => Ok(ScrapeProcessingType::Accessibility),
            "form" => Ok(ScrapeProcessingType::Form),
            _ => Err(ValidationError::UnknownProcessingType(s.to_string())),
        }
    }
}

/// 已知的抓取选项键
pub mod scrape_options {
    pub const ENABLE_JAVASCRIPT: &str = "enableJavascript";
    pub const HIDE_CONSENT_BANNERS: &str = "hideConsentBanners";
    pub const PAGE_LOAD_TIMEOUT: &str = "pageLoadTimeout";
    pub const SECTION_LOAD_WAIT_TIME: &str = "sectionLoadWaitTime";
    pub const WAIT_FOR_SELECTOR: &str = "waitForSelector";
    pub const SCREENSHOT_TYPES: &str = "screenshotTypes";

    pub const ALL: [&str; 6] = [
        ENABLE_JAVASCRIPT,
        HIDE_CONSENT_BANNERS,
        PAGE_LOAD_TIMEOUT,
        SECTION_LOAD_WAIT_TIME,
        WAIT_FOR_SELECTOR,
        SCREENSHOT_TYPES,
    ];

    /// `screenshotTypes` 允许的取值
    pub const SCREENSHOT_TYPE_VALUES: [&str; 4] = ["fullpage", "thumbnail", "scroll", "block"];
}

/// 校验抓取选项
///
/// 未知键（大小写不敏感匹配）整体拒绝；已知键按类型逐一校验
///
/// # 返回值
///
/// * `Ok(())` - 选项合法
/// * `Err(ValidationError::InvalidOptions)` - 存在未知键或类型错误
pub fn validate_scrape_options(options: &Map<String, Value>) -> Result<(), ValidationError> {
    use scrape_options::*;

    let unknown: Vec<&str> = options
        .keys()
        .filter(|key| !ALL.iter().any(|known| known.eq_ignore_ascii_case(key)))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::InvalidOptions(format!(
            "Invalid options: {}",
            unknown.join(",")
        )));
    }

    for (key, value) in options {
        let valid = match key.as_str() {
            ENABLE_JAVASCRIPT | HIDE_CONSENT_BANNERS => value.is_boolean(),
            PAGE_LOAD_TIMEOUT | SECTION_LOAD_WAIT_TIME => value.is_u64(),
            WAIT_FOR_SELECTOR => value.is_string(),
            SCREENSHOT_TYPES => value.as_array().is_some_and(|items| {
                items.iter().all(|item| {
                    item.as_str()
                        .is_some_and(|s| SCREENSHOT_TYPE_VALUES.contains(&s))
                })
            }),
            _ => true,
        };
        if !valid {
            return Err(ValidationError::InvalidOptions(format!(
                "Invalid value for {}: {}",
                key, value
            )));
        }
    }

    Ok(())
}
