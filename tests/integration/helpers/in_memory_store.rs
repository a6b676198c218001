// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scrapevisor::domain::models::scrape_job::{NewScrapeJob, ScrapeJob, ScrapeProcessingType};
use scrapevisor::domain::models::scrape_url::{recent_window, ScrapeUrl, ScrapeUrlStatus};
use scrapevisor::domain::repositories::scrape_job_repository::{
    RepositoryError, ScrapeJobRepository,
};
use scrapevisor::domain::repositories::scrape_url_repository::ScrapeUrlRepository;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// 内存任务仓库
pub struct InMemoryScrapeJobRepository {
    jobs: Mutex<Vec<ScrapeJob>>,
    broken: AtomicBool,
}

impl InMemoryScrapeJobRepository {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            broken: AtomicBool::new(false),
        }
    }

    /// 之后的所有调用都返回存储错误
    pub fn break_store(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn repair_store(&self) {
        self.broken.store(false, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> Vec<ScrapeJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn insert(&self, job: ScrapeJob) {
        self.jobs.lock().unwrap().push(job);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(RepositoryError::Corrupted("store unavailable".to_string()));
        }
        Ok(())
    }

    fn filtered(&self, predicate: impl Fn(&ScrapeJob) -> bool) -> Result<Vec<ScrapeJob>, RepositoryError> {
        self.check()?;
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| predicate(job))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScrapeJobRepository for InMemoryScrapeJobRepository {
    async fn create(&self, job: NewScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        self.check()?;
        let job = job.into_job(Uuid::new_v4(), Utc::now());
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<ScrapeJob, RepositoryError> {
        self.filtered(|job| job.id == id)?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }

    async fn all_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScrapeJob>, RepositoryError> {
        self.filtered(|job| job.started_at >= start && job.started_at <= end)
    }

    async fn all_by_base_url(&self, base_url: &str) -> Result<Vec<ScrapeJob>, RepositoryError> {
        self.filtered(|job| job.base_url == base_url)
    }

    async fn all_by_base_url_and_processing_type(
        &self,
        base_url: &str,
        processing_type: ScrapeProcessingType,
    ) -> Result<Vec<ScrapeJob>, RepositoryError> {
        self.filtered(|job| job.base_url == base_url && job.processing_type == processing_type)
    }
}

/// 内存URL记录仓库，模拟 worker 写回的结果
pub struct InMemoryScrapeUrlRepository {
    urls: Mutex<Vec<ScrapeUrl>>,
}

impl InMemoryScrapeUrlRepository {
    pub fn new() -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
        }
    }

    /// 写入一条 worker 结果
    pub fn record(
        &self,
        job: &ScrapeJob,
        url: &str,
        status: ScrapeUrlStatus,
        reason: Option<&str>,
        path: Option<&str>,
    ) {
        let now = Utc::now();
        self.urls.lock().unwrap().push(ScrapeUrl {
            id: Uuid::new_v4(),
            scrape_job_id: job.id,
            url: url.to_string(),
            status,
            processing_type: job.processing_type,
            reason: reason.map(str::to_string),
            path: path.map(str::to_string),
            is_original: true,
            created_at: now,
            updated_at: now,
        });
    }
}

#[async_trait]
impl ScrapeUrlRepository for InMemoryScrapeUrlRepository {
    async fn all_by_scrape_job_id(
        &self,
        scrape_job_id: Uuid,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError> {
        Ok(self
            .urls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.scrape_job_id == scrape_job_id)
            .cloned()
            .collect())
    }

    async fn all_recent_by_url_and_processing_type(
        &self,
        url: &str,
        processing_type: ScrapeProcessingType,
        max_age_hours: f64,
    ) -> Result<Vec<ScrapeUrl>, RepositoryError> {
        let (start, end) = recent_window(Utc::now(), max_age_hours);
        Ok(self
            .urls
            .lock()
            .unwrap()
            .iter()
            .filter(|record| {
                record.url == url
                    && record.processing_type == processing_type
                    && record.is_original
                    && record.created_at >= start
                    && record.created_at <= end
            })
            .cloned()
            .collect())
    }
}
