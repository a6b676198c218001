// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::setup_sqlite;
use chrono::{DateTime, Duration, Utc};
use scrapevisor::domain::models::scrape_job::{
    NewScrapeJob, ScrapeJob, ScrapeJobStatus, ScrapeProcessingType,
};
use scrapevisor::domain::models::scrape_url::{ScrapeUrlStatus, DEFAULT_RECENT_MAX_AGE_HOURS};
use scrapevisor::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use scrapevisor::domain::repositories::scrape_url_repository::ScrapeUrlRepository;
use scrapevisor::infrastructure::database::entities::scrape_url as scrape_url_entity;
use scrapevisor::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use scrapevisor::infrastructure::repositories::scrape_url_repo_impl::ScrapeUrlRepositoryImpl;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Map;
use std::sync::Arc;
use uuid::Uuid;

async fn create_job(db: &Arc<DatabaseConnection>) -> ScrapeJob {
    ScrapeJobRepositoryImpl::new(db.clone())
        .create(NewScrapeJob {
            base_url: "https://www.example.com".to_string(),
            processing_type: ScrapeProcessingType::Default,
            options: Map::new(),
            custom_headers: None,
            url_count: 3,
            status: ScrapeJobStatus::Running,
        })
        .await
        .unwrap()
}

/// 模拟 worker 写入一条URL记录
async fn insert_url(
    db: &Arc<DatabaseConnection>,
    job_id: Uuid,
    url: &str,
    status: ScrapeUrlStatus,
    is_original: bool,
    created_at: DateTime<Utc>,
) {
    scrape_url_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        scrape_job_id: Set(job_id),
        url: Set(url.to_string()),
        status: Set(status.to_string()),
        processing_type: Set("default".to_string()),
        reason: Set(None),
        path: Set(Some(format!("scrapes/{}/scrape.json", job_id))),
        is_original: Set(is_original),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
    }
    .insert(db.as_ref())
    .await
    .unwrap();
}

#[tokio::test]
async fn test_all_by_scrape_job_id() {
    let db = setup_sqlite().await;
    let job = create_job(&db).await;
    let other = create_job(&db).await;
    let now = Utc::now();

    insert_url(&db, job.id, "https://www.example.com/a", ScrapeUrlStatus::Complete, true, now).await;
    insert_url(&db, job.id, "https://www.example.com/b", ScrapeUrlStatus::Failed, true, now).await;
    insert_url(&db, other.id, "https://www.example.com/c", ScrapeUrlStatus::Pending, true, now).await;

    let repo = ScrapeUrlRepositoryImpl::new(db.clone());
    let urls = repo.all_by_scrape_job_id(job.id).await.unwrap();
    assert_eq!(urls.len(), 2);
    assert!(urls.iter().all(|url| url.scrape_job_id == job.id));
    assert!(repo
        .all_by_scrape_job_id(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());
}

/// 只返回时间窗口内的原始抓取记录
#[tokio::test]
async fn test_all_recent_by_url_and_processing_type() {
    let db = setup_sqlite().await;
    let job = create_job(&db).await;
    let url = "https://www.example.com/page";
    let now = Utc::now();

    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, true, now - Duration::hours(2)).await;
    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, false, now - Duration::hours(1)).await;
    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, true, now - Duration::days(10)).await;

    let repo = ScrapeUrlRepositoryImpl::new(db.clone());

    let week = repo
        .all_recent_by_url_and_processing_type(
            url,
            ScrapeProcessingType::Default,
            DEFAULT_RECENT_MAX_AGE_HOURS,
        )
        .await
        .unwrap();
    assert_eq!(week.len(), 1);
    assert!(week[0].is_original);

    let one_hour = repo
        .all_recent_by_url_and_processing_type(url, ScrapeProcessingType::Default, 1.0)
        .await
        .unwrap();
    assert!(one_hour.is_empty());

    let other_type = repo
        .all_recent_by_url_and_processing_type(url, ScrapeProcessingType::Form, 24.0)
        .await
        .unwrap();
    assert!(other_type.is_empty());
}

/// 超大的时间窗口不溢出，返回全部原始记录
#[tokio::test]
async fn test_all_recent_with_out_of_range_age() {
    let db = setup_sqlite().await;
    let job = create_job(&db).await;
    let url = "https://www.example.com/page";
    let now = Utc::now();

    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, true, now - Duration::hours(2)).await;
    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, true, now - Duration::days(400)).await;
    insert_url(&db, job.id, url, ScrapeUrlStatus::Complete, false, now - Duration::hours(1)).await;

    let repo = ScrapeUrlRepositoryImpl::new(db.clone());
    let all = repo
        .all_recent_by_url_and_processing_type(url, ScrapeProcessingType::Default, 1.0e12)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|record| record.is_original));
}
