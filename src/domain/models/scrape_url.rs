// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::scrape_job::ScrapeProcessingType;

/// 查询近期抓取记录时的默认时间窗口（小时）
pub const DEFAULT_RECENT_MAX_AGE_HOURS: f64 = 168.0;

/// 单个 URL 的抓取记录
///
/// 由外部 worker 在处理批次消息后写入，本服务只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeUrl {
    pub id: Uuid,
    /// 所属任务ID
    pub scrape_job_id: Uuid,
    pub url: String,
    pub status: ScrapeUrlStatus,
    pub processing_type: ScrapeProcessingType,
    /// 失败原因
    pub reason: Option<String>,
    /// 抓取结果的存储路径
    pub path: Option<String>,
    /// 是否为原始抓取（而非复用先前结果）
    pub is_original: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// URL 抓取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapeUrlStatus {
    #[default]
    Pending,
    Running,
    Complete,
    Failed,
    Redirect,
    Stopped,
}

impl fmt::Display for ScrapeUrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrapeUrlStatus::Pending => write!(f, "PENDING"),
            ScrapeUrlStatus::Running => write!(f, "RUNNING"),
            ScrapeUrlStatus::Complete => write!(f, "COMPLETE"),
            ScrapeUrlStatus::Failed => write!(f, "FAILED"),
            ScrapeUrlStatus::Redirect => write!(f, "REDIRECT"),
            ScrapeUrlStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

impl FromStr for ScrapeUrlStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ScrapeUrlStatus::Pending),
            "RUNNING" => Ok(ScrapeUrlStatus::Running),
            "COMPLETE" => Ok(ScrapeUrlStatus::Complete),
            "FAILED" => Ok(ScrapeUrlStatus::Failed),
            "REDIRECT" => Ok(ScrapeUrlStatus::Redirect),
            "STOPPED" => Ok(ScrapeUrlStatus::Stopped),
            _ => Err(()),
        }
    }
}

/// 计算近期记录的查询窗口 `[now - max_age_hours, now]`
///
/// 支持小数小时；负值与 NaN 按 0 处理，超出时间范围（含正无穷）时起点取 `DateTime::<Utc>::MIN_UTC`
pub fn recent_window(now: DateTime<Utc>, max_age_hours: f64) -> (DateTime<Utc>, DateTime<Utc>) {
    if max_age_hours.is_nan() || max_age_hours <= 0.0 {
        return (now, now);
    }
    if max_age_hours.is_infinite() {
        return (DateTime::<Utc>::MIN_UTC, now);
    }

    // f64 -> i64 饱和转换，越界由 try_milliseconds / checked_sub_signed 兜底
    let millis = (max_age_hours * 3_600_000.0).round() as i64;
    let start = TimeDelta::try_milliseconds(millis)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    (start, now)
}
