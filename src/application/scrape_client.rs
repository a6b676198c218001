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

use crate::application::dto::scrape_job_dto::{ScrapeJobDto, ScrapeUrlResultDto};
use crate::application::dto::scrape_job_request::CreateScrapeJobRequest;
use crate::config::ScrapeJobConfiguration;
use crate::domain::models::scrape_job::{validate_scrape_options, ScrapeJob, ScrapeProcessingType};
use crate::domain::models::scrape_url::{ScrapeUrl, ScrapeUrlStatus};
use crate::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use crate::domain::repositories::scrape_url_repository::ScrapeUrlRepository;
use crate::domain::services::scrape_job_supervisor::{
    JobSubmission, ScrapeJobSupervisor, SupervisorError,
};
use crate::queue::publisher::QueuePublisher;
use crate::utils::validators::{is_iso_date, is_valid_url, parse_job_id, ValidationError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// 抓取客户端错误类型
#[derive(Error, Debug)]
pub enum ScrapeClientError {
    /// 在调用监督器之前发现的输入错误，不带操作前缀
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 下游失败，`context` 描述失败的操作及其关键参数
    #[error("{context}{source}")]
    Operation {
        context: String,
        #[source]
        source: SupervisorError,
    },
}

impl ScrapeClientError {
    /// 是否由调用方输入引起
    pub fn is_validation(&self) -> bool {
        match self {
            ScrapeClientError::Validation(_) => true,
            ScrapeClientError::Operation { source, .. } => source.is_validation(),
        }
    }
}

/// 记录错误日志并附加操作上下文
fn operation_error(context: String, source: SupervisorError) -> ScrapeClientError {
    error!("{}{}", context, source);
    ScrapeClientError::Operation { context, source }
}

fn to_dtos(jobs: Vec<ScrapeJob>) -> Vec<ScrapeJobDto> {
    jobs.into_iter().map(ScrapeJobDto::from).collect()
}

/// 抓取客户端
///
/// 对外的门面：先校验请求，再委托给监督器，最后把领域对象转换为响应DTO
pub struct ScrapeClient<J, U, Q>
where
    J: ScrapeJobRepository,
    U: ScrapeUrlRepository,
    Q: QueuePublisher,
{
    supervisor: ScrapeJobSupervisor<J, U, Q>,
    configuration: ScrapeJobConfiguration,
}

impl<J, U, Q> ScrapeClient<J, U, Q>
where
    J: ScrapeJobRepository,
    U: ScrapeUrlRepository,
    Q: QueuePublisher,
{
    /// 创建新的抓取客户端
    ///
    /// # 参数
    ///
    /// * `job_repo` - 任务仓库
    /// * `url_repo` - URL记录仓库
    /// * `publisher` - 队列发布者
    /// * `configuration` - 已校验的抓取任务配置
    pub fn new(
        job_repo: Arc<J>,
        url_repo: Arc<U>,
        publisher: Arc<Q>,
        configuration: ScrapeJobConfiguration,
    ) -> Self {
        let supervisor = ScrapeJobSupervisor::new(job_repo, url_repo, publisher, &configuration);
        Self {
            supervisor,
            configuration,
        }
    }

    /// 当前生效的抓取任务配置
    pub fn configuration(&self) -> &ScrapeJobConfiguration {
        &self.configuration
    }

    /// 创建并启动新的抓取任务
    ///
    /// # 参数
    ///
    /// * `data` - 请求体，见 [`CreateScrapeJobRequest`]
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJobDto)` - 新建任务
    /// * `Err(ScrapeClientError)` - 以 `Failed to create a new scrape job: ` 为前缀的错误
    pub async fn create_scrape_job(&self, data: &Value) -> Result<ScrapeJobDto, ScrapeClientError> {
        let context = || "Failed to create a new scrape job: ".to_string();

        let request =
            CreateScrapeJobRequest::parse(data, self.configuration.max_urls_per_job())
                .map_err(|e| operation_error(context(), e.into()))?;
        debug!("Creating a new scrape job with {} URLs.", request.urls.len());

        // 请求选项覆盖服务默认值
        let mut options = self.configuration.default_options();
        options.extend(request.options);
        validate_scrape_options(&options).map_err(|e| operation_error(context(), e.into()))?;

        let submission = JobSubmission {
            urls: request.urls,
            processing_type: request.processing_type,
            options,
            custom_headers: request.custom_headers,
            max_scrape_age: request.max_scrape_age,
            meta_data: request.audit_data,
        };

        let job = self
            .supervisor
            .start_new_job(submission)
            .await
            .map_err(|e| operation_error(context(), e))?;
        Ok(job.into())
    }

    /// 获取时间范围内的任务
    ///
    /// 两个日期都必须是 `YYYY-MM-DDTHH:mm:ss.sssZ` 格式，否则在查询前直接返回校验错误
    pub async fn get_scrape_jobs_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ScrapeJobDto>, ScrapeClientError> {
        debug!(
            "Fetching scrape jobs between startDate: {} and endDate: {}.",
            start_date, end_date
        );

        let (start, end) = parse_date_range(start_date, end_date)?;
        let jobs = self
            .supervisor
            .get_scrape_jobs_by_date_range(start, end)
            .await
            .map_err(|e| {
                operation_error(
                    format!(
                        "Failed to fetch scrape jobs between startDate: {} and endDate: {}, ",
                        start_date, end_date
                    ),
                    e,
                )
            })?;
        Ok(to_dtos(jobs))
    }

    /// 获取任务状态
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(ScrapeJobDto))` - 任务存在
    /// * `Ok(None)` - 任务不存在
    /// * `Err(ScrapeClientError::Validation)` - `job_id` 不是合法的UUID
    pub async fn get_scrape_job_status(
        &self,
        job_id: &str,
    ) -> Result<Option<ScrapeJobDto>, ScrapeClientError> {
        parse_job_id(job_id).map_err(|_| ValidationError::JobIdRequired)?;

        let job = self.supervisor.get_scrape_job(job_id).await.map_err(|e| {
            operation_error(
                format!(
                    "Failed to fetch scrape job status for jobId: {}, message: ",
                    job_id
                ),
                e,
            )
        })?;
        Ok(job.map(ScrapeJobDto::from))
    }

    /// 获取任务下每个URL的抓取结果
    pub async fn get_scrape_job_url_results(
        &self,
        job_id: &str,
    ) -> Result<Option<Vec<ScrapeUrlResultDto>>, ScrapeClientError> {
        let urls = self
            .scrape_urls_of_job(job_id)
            .await
            .map_err(|e| operation_error("Failed to fetch the scrape job result: ".to_string(), e))?;
        Ok(urls.map(|urls| urls.into_iter().map(ScrapeUrlResultDto::from).collect()))
    }

    /// 获取任务中已完成URL的结果路径
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(map))` - URL 到存储路径的映射，只包含 `COMPLETE` 的记录
    /// * `Ok(None)` - 任务不存在
    pub async fn get_scrape_result_paths(
        &self,
        job_id: &str,
    ) -> Result<Option<BTreeMap<String, Option<String>>>, ScrapeClientError> {
        let urls = self
            .scrape_urls_of_job(job_id)
            .await
            .map_err(|e| operation_error("Failed to fetch the scrape job result: ".to_string(), e))?;
        Ok(urls.map(|urls| {
            urls.into_iter()
                .filter(|url| url.status == ScrapeUrlStatus::Complete)
                .map(|url| (url.url, url.path))
                .collect()
        }))
    }

    async fn scrape_urls_of_job(
        &self,
        job_id: &str,
    ) -> Result<Option<Vec<ScrapeUrl>>, SupervisorError> {
        let Some(job) = self.supervisor.get_scrape_job(job_id).await? else {
            return Ok(None);
        };
        Ok(Some(self.supervisor.get_scrape_urls_by_job_id(job.id).await?))
    }

    /// 按 baseURL（可选处理类型）查询任务
    ///
    /// `base_url` 先做URL解码再校验；没有匹配任务时返回空数组
    ///
    /// # 参数
    ///
    /// * `base_url` - URL编码后的 baseURL
    /// * `processing_type` - 可选的处理类型，空字符串等同未指定
    pub async fn get_scrape_jobs_by_base_url(
        &self,
        base_url: &str,
        processing_type: Option<&str>,
    ) -> Result<Vec<ScrapeJobDto>, ScrapeClientError> {
        let processing_type = processing_type.filter(|t| !t.trim().is_empty());
        let context = |base_url: &str| {
            let suffix = processing_type
                .map(|t| format!(" and processing type: {}", t))
                .unwrap_or_default();
            format!("Failed to fetch scrape jobs by baseURL: {}{}, ", base_url, suffix)
        };
        // 解码结果不是合法 UTF-8 时按无效 baseURL 处理
        let decoded = match urlencoding::decode(base_url) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => {
                return Err(operation_error(
                    context(base_url),
                    ValidationError::InvalidBaseUrl.into(),
                ))
            }
        };
        debug!("Fetching scrape jobs by baseURL: {}", decoded);

        let jobs = self
            .jobs_by_base_url(&decoded, processing_type)
            .await
            .map_err(|e| operation_error(context(&decoded), e))?;
        Ok(to_dtos(jobs))
    }

    async fn jobs_by_base_url(
        &self,
        base_url: &str,
        processing_type: Option<&str>,
    ) -> Result<Vec<ScrapeJob>, SupervisorError> {
        if !is_valid_url(base_url) {
            return Err(ValidationError::InvalidBaseUrl.into());
        }
        match processing_type {
            Some(tag) => {
                let processing_type = tag.parse::<ScrapeProcessingType>()?;
                self.supervisor
                    .get_scrape_jobs_by_base_url_and_processing_type(base_url, processing_type)
                    .await
            }
            None => self.supervisor.get_scrape_jobs_by_base_url(base_url).await,
        }
    }
}

/// 校验并解析日期范围
fn parse_date_range(
    start_date: &str,
    end_date: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    if !is_iso_date(start_date) || !is_iso_date(end_date) {
        return Err(ValidationError::InvalidDateRange);
    }
    let parse = |date: &str| {
        DateTime::parse_from_rfc3339(date)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| ValidationError::InvalidDateRange)
    };
    Ok((parse(start_date)?, parse(end_date)?))
}
