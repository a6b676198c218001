// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::setup_sqlite;
use chrono::{Duration, Utc};
use scrapevisor::domain::models::scrape_job::{
    NewScrapeJob, ScrapeJobStatus, ScrapeProcessingType,
};
use scrapevisor::domain::repositories::scrape_job_repository::{
    RepositoryError, ScrapeJobRepository,
};
use scrapevisor::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use serde_json::json;
use uuid::Uuid;

fn new_job(base_url: &str, processing_type: ScrapeProcessingType) -> NewScrapeJob {
    NewScrapeJob {
        base_url: base_url.to_string(),
        processing_type,
        options: json!({ "enableJavascript": true }).as_object().cloned().unwrap(),
        custom_headers: Some(json!({ "User-Agent": "scrapevisor" }).as_object().cloned().unwrap()),
        url_count: 2,
        status: ScrapeJobStatus::Running,
    }
}

/// 创建后按ID读回，字段保持一致
#[tokio::test]
async fn test_create_then_find_by_id_round_trips() {
    let db = setup_sqlite().await;
    let repo = ScrapeJobRepositoryImpl::new(db);

    let created = repo
        .create(new_job("https://www.example.com", ScrapeProcessingType::Default))
        .await
        .unwrap();
    assert_eq!(created.status, ScrapeJobStatus::Running);
    assert_eq!(created.url_count, 2);

    let found = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_find_by_id_reports_not_found() {
    let db = setup_sqlite().await;
    let repo = ScrapeJobRepositoryImpl::new(db);

    let result = repo.find_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_queries_by_base_url_and_processing_type() {
    let db = setup_sqlite().await;
    let repo = ScrapeJobRepositoryImpl::new(db);

    repo.create(new_job("https://a.example.com", ScrapeProcessingType::Default))
        .await
        .unwrap();
    repo.create(new_job("https://a.example.com", ScrapeProcessingType::Form))
        .await
        .unwrap();
    repo.create(new_job("https://b.example.com", ScrapeProcessingType::Default))
        .await
        .unwrap();

    let all_a = repo.all_by_base_url("https://a.example.com").await.unwrap();
    assert_eq!(all_a.len(), 2);

    let forms = repo
        .all_by_base_url_and_processing_type("https://a.example.com", ScrapeProcessingType::Form)
        .await
        .unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].processing_type, ScrapeProcessingType::Form);

    assert!(repo
        .all_by_base_url("https://c.example.com")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_all_by_date_range_filters_on_start_time() {
    let db = setup_sqlite().await;
    let repo = ScrapeJobRepositoryImpl::new(db);

    let job = repo
        .create(new_job("https://www.example.com", ScrapeProcessingType::Default))
        .await
        .unwrap();

    let now = Utc::now();
    let inside = repo
        .all_by_date_range(now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].id, job.id);

    let before = repo
        .all_by_date_range(now - Duration::days(2), now - Duration::days(1))
        .await
        .unwrap();
    assert!(before.is_empty());
}
