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

use crate::config::ScrapeJobConfiguration;
use crate::domain::models::scrape_job::{
    NewScrapeJob, ScrapeJob, ScrapeJobStatus, ScrapeProcessingType,
};
use crate::domain::models::scrape_url::ScrapeUrl;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::domain::repositories::scrape_url_repository::ScrapeUrlRepository;
use crate::infrastructure::metrics::{
    SCRAPE_JOBS_CREATED, SCRAPE_QUEUE_MESSAGES_PUBLISHED, SCRAPE_QUEUE_PUBLISH_FAILURES,
};
use crate::queue::batch::split_into_batches;
use crate::queue::message::ScrapeQueueMessage;
use crate::queue::publisher::{QueueError, QueuePublisher};
use crate::utils::validators::{is_valid_url, parse_job_id, ValidationError};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// 监督器错误类型
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// 输入校验失败，发生在任何 I/O 之前
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Queue(#[from] QueueError),

    /// 任务已持久化，但只有前 `published_batches` 个批次成功入队
    ///
    /// 任务保持 `RUNNING`，调用方可以从 `next_batch_offset` 继续投递
    #[error("Failed to publish batch at offset {next_batch_offset} of job {job_id} after {published_batches} published batch(es): {source}")]
    PartialPublish {
        job_id: Uuid,
        published_batches: usize,
        next_batch_offset: usize,
        #[source]
        source: QueueError,
    },
}

impl SupervisorError {
    /// 是否为调用方输入错误
    pub fn is_validation(&self) -> bool {
        matches!(self, SupervisorError::Validation(_))
    }
}

/// 一次抓取任务的提交参数
#[derive(Debug, Clone, PartialEq)]
pub struct JobSubmission {
    /// 待抓取的 URL，顺序即结果编号顺序
    pub urls: Vec<String>,
    pub processing_type: ScrapeProcessingType,
    /// 已合并的抓取选项
    pub options: Map<String, Value>,
    pub custom_headers: Option<Map<String, Value>>,
    /// 可复用已有抓取结果的最大年龄（小时）
    pub max_scrape_age: f64,
    /// 透传给 worker 的审计数据
    pub meta_data: Value,
}

/// 从首个 URL 推导 `scheme://host`
fn determine_base_url(urls: &[String]) -> Result<String, ValidationError> {
    let first = urls.first().ok_or(ValidationError::EmptyUrls)?;
    let parsed = Url::parse(first).map_err(|_| ValidationError::InvalidUrl(first.clone()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ValidationError::InvalidUrl(first.clone()))?;
    Ok(format!("{}://{}", parsed.scheme(), host))
}

/// 任务 URL 数，超出存储列的 i32 范围时视为 URL 过多
fn url_count(len: usize) -> Result<i32, ValidationError> {
    i32::try_from(len).map_err(|_| ValidationError::TooManyUrls {
        provided: len,
        max: i32::MAX as usize,
    })
}

/// 把 "未找到" 折叠为 `None`，其他错误原样返回
fn found<T>(result: Result<T, RepositoryError>) -> Result<Option<T>, SupervisorError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RepositoryError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// 抓取任务监督器
///
/// 负责任务从创建到入队的生命周期：持久化任务、切分批次、按顺序发布队列消息，
/// 并提供任务与URL记录的查询。任务与URL存储、队列发布者均由构造函数注入。
pub struct ScrapeJobSupervisor<J, U, Q>
where
    J: ScrapeJobRepository,
    U: ScrapeUrlRepository,
    Q: QueuePublisher,
{
    /// 任务仓库
    job_repo: Arc<J>,
    /// URL记录仓库
    url_repo: Arc<U>,
    /// 队列发布者
    publisher: Arc<Q>,
    /// 工作队列地址
    worker_queue: String,
    /// 单条消息的URL上限
    max_urls_per_message: usize,
}

impl<J, U, Q> ScrapeJobSupervisor<J, U, Q>
where
    J: ScrapeJobRepository,
    U: ScrapeUrlRepository,
    Q: QueuePublisher,
{
    /// 创建新的抓取任务监督器
    ///
    /// # 参数
    ///
    /// * `job_repo` - 任务仓库
    /// * `url_repo` - URL记录仓库
    /// * `publisher` - 队列发布者
    /// * `config` - 抓取任务配置，提供工作队列地址与消息大小上限
    ///
    /// # 返回值
    ///
    /// 返回新的监督器实例
    pub fn new(
        job_repo: Arc<J>,
        url_repo: Arc<U>,
        publisher: Arc<Q>,
        config: &ScrapeJobConfiguration,
    ) -> Self {
        Self {
            job_repo,
            url_repo,
            publisher,
            worker_queue: config.scrape_worker_queue.clone(),
            max_urls_per_message: config.max_urls_per_message(),
        }
    }

    /// 启动新的抓取任务
    ///
    /// 先以 `RUNNING` 状态持久化任务，再按 `batch_offset` 递增顺序逐个发布批次消息。
    /// 方法不会等待 worker 完成。
    ///
    /// # 参数
    ///
    /// * `submission` - 任务提交参数
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 新建的任务（状态为 `RUNNING`）
    /// * `Err(SupervisorError::PartialPublish)` - 任务已创建但部分批次未入队
    /// * `Err(SupervisorError)` - 校验或存储错误
    pub async fn start_new_job(
        &self,
        submission: JobSubmission,
    ) -> Result<ScrapeJob, SupervisorError> {
        let base_url = determine_base_url(&submission.urls)?;
        let count = url_count(submission.urls.len())?;

        let new_job = NewScrapeJob {
            base_url,
            processing_type: submission.processing_type,
            options: submission.options.clone(),
            custom_headers: submission.custom_headers.clone(),
            url_count: count,
            status: ScrapeJobStatus::Running,
        };
        info!(
            base_url = %new_job.base_url,
            url_count = new_job.url_count,
            processing_type = %new_job.processing_type,
            "Creating a new scrape job"
        );

        let job = self.job_repo.create(new_job).await?;
        counter!(SCRAPE_JOBS_CREATED).increment(1);
        info!(
            job_id = %job.id,
            base_url = %job.base_url,
            url_count = job.url_count,
            "New scrape job created"
        );

        self.queue_urls_for_scrape_worker(&job, &submission).await?;

        Ok(job)
    }

    /// 按顺序发布批次消息
    async fn queue_urls_for_scrape_worker(
        &self,
        job: &ScrapeJob,
        submission: &JobSubmission,
    ) -> Result<(), SupervisorError> {
        let urls = submission.urls.as_slice();
        let batches = if urls.len() > self.max_urls_per_message {
            split_into_batches(urls, self.max_urls_per_message)
        } else {
            vec![urls]
        };
        let total = batches.len();

        let mut batch_offset = 0;
        for (index, batch) in batches.into_iter().enumerate() {
            let message = ScrapeQueueMessage {
                processing_type: job.processing_type,
                job_id: job.id,
                batch: batch.to_vec(),
                batch_offset,
                custom_headers: submission.custom_headers.clone(),
                options: submission.options.clone(),
                max_scrape_age: submission.max_scrape_age,
                meta_data: submission.meta_data.clone(),
            };
            let body = serde_json::to_value(&message).map_err(QueueError::from)?;

            if let Err(e) = self
                .publisher
                .send_message(&self.worker_queue, &body, Some(job.id.to_string()))
                .await
            {
                counter!(SCRAPE_QUEUE_PUBLISH_FAILURES).increment(1);
                warn!(
                    job_id = %job.id,
                    published_batches = index,
                    next_batch_offset = batch_offset,
                    error = %e,
                    "Scrape job left RUNNING with only part of its batches queued"
                );
                return Err(SupervisorError::PartialPublish {
                    job_id: job.id,
                    published_batches: index,
                    next_batch_offset: batch_offset,
                    source: e,
                });
            }

            counter!(SCRAPE_QUEUE_MESSAGES_PUBLISHED, "processing_type" => job.processing_type.as_str())
                .increment(1);
            info!(
                job_id = %job.id,
                batch = index + 1,
                total_batches = total,
                batch_offset,
                batch_size = batch.len(),
                "Queued scrape batch"
            );
            batch_offset += batch.len();
        }

        Ok(())
    }

    /// 获取抓取任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(ScrapeJob))` - 找到任务
    /// * `Ok(None)` - 任务不存在
    /// * `Err(SupervisorError::Validation)` - `job_id` 不是合法的UUID
    pub async fn get_scrape_job(&self, job_id: &str) -> Result<Option<ScrapeJob>, SupervisorError> {
        let id = parse_job_id(job_id)?;
        found(self.job_repo.find_by_id(id).await)
    }

    /// 获取指定时间范围内开始的任务
    pub async fn get_scrape_jobs_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScrapeJob>, SupervisorError> {
        Ok(self.job_repo.all_by_date_range(start, end).await?)
    }

    pub async fn get_scrape_jobs_by_base_url(
        &self,
        base_url: &str,
    ) -> Result<Vec<ScrapeJob>, SupervisorError> {
        Ok(self.job_repo.all_by_base_url(base_url).await?)
    }

    pub async fn get_scrape_jobs_by_base_url_and_processing_type(
        &self,
        base_url: &str,
        processing_type: ScrapeProcessingType,
    ) -> Result<Vec<ScrapeJob>, SupervisorError> {
        Ok(self
            .job_repo
            .all_by_base_url_and_processing_type(base_url, processing_type)
            .await?)
    }

    /// 获取任务下的全部URL记录
    pub async fn get_scrape_urls_by_job_id(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ScrapeUrl>, SupervisorError> {
        Ok(self.url_repo.all_by_scrape_job_id(job_id).await?)
    }

    /// 获取某个URL近期的原始抓取记录
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `processing_type` - 处理类型
    /// * `max_scrape_age` - 时间窗口（小时）
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Vec<ScrapeUrl>))` - 窗口内的记录
    /// * `Ok(None)` - 存储报告未找到
    pub async fn get_scrape_urls_by_processing_type(
        &self,
        url: &str,
        processing_type: ScrapeProcessingType,
        max_scrape_age: f64,
    ) -> Result<Option<Vec<ScrapeUrl>>, SupervisorError> {
        if !is_valid_url(url) {
            return Err(ValidationError::InvalidUrl(url.to_string()).into());
        }
        found(
            self.url_repo
                .all_recent_by_url_and_processing_type(url, processing_type, max_scrape_age)
                .await,
        )
    }
}
