// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::mock_queue::MockQueuePublisher;
use super::helpers::{TestContext, TEST_QUEUE};
use scrapevisor::application::ScrapeClientError;
use scrapevisor::domain::models::scrape_job::ScrapeJobStatus;
use scrapevisor::domain::models::scrape_url::ScrapeUrlStatus;
use scrapevisor::domain::services::scrape_job_supervisor::SupervisorError;
use serde_json::json;
use uuid::Uuid;

fn urls(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://www.example.com/page-{}", i))
        .collect()
}

/// 2500 个URL按 1000 一批发布 3 条消息
#[tokio::test]
async fn test_create_scrape_job_publishes_ordered_batches() {
    let ctx = TestContext::new(5000, 1000);
    let requested = urls(2500);

    let job = ctx
        .client
        .create_scrape_job(&json!({ "urls": requested, "processingType": "accessibility" }))
        .await
        .unwrap();

    assert_eq!(job.status, ScrapeJobStatus::Running);
    assert_eq!(job.url_count, 2500);
    assert_eq!(job.base_url, "https://www.example.com");

    let sent = ctx.publisher.sent();
    assert_eq!(sent.len(), 3);
    let offsets: Vec<_> = sent.iter().map(|m| m.body["batchOffset"].clone()).collect();
    assert_eq!(offsets, vec![json!(0), json!(1000), json!(2000)]);

    let mut rebuilt = Vec::new();
    for message in &sent {
        assert_eq!(message.queue_url, TEST_QUEUE);
        assert_eq!(message.message_group_id, Some(job.id.to_string()));
        assert_eq!(message.body["processingType"], json!("accessibility"));
        for url in message.body["batch"].as_array().unwrap() {
            rebuilt.push(url.as_str().unwrap().to_string());
        }
    }
    assert_eq!(rebuilt, requested);
}

/// 默认选项与请求选项合并，请求优先
#[tokio::test]
async fn test_create_scrape_job_merges_options_and_defaults() {
    let ctx = TestContext::new(1, 1000);

    let job = ctx
        .client
        .create_scrape_job(&json!({
            "urls": ["https://www.example.com/"],
            "options": { "enableJavascript": false, "pageLoadTimeout": 5000 },
            "customHeaders": { "Authorization": "Bearer token" }
        }))
        .await
        .unwrap();

    assert_eq!(job.options["enableJavascript"], json!(false));
    assert_eq!(job.options["hideConsentBanners"], json!(true));
    assert_eq!(job.options["pageLoadTimeout"], json!(5000));
    assert_eq!(job.custom_headers.unwrap()["Authorization"], json!("Bearer token"));

    let sent = ctx.publisher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body["maxScrapeAge"], json!(24.0));
    assert_eq!(sent[0].body["metaData"], json!({}));
    assert_eq!(sent[0].body["options"]["enableJavascript"], json!(false));
}

#[tokio::test]
async fn test_create_scrape_job_rejects_invalid_requests() {
    let ctx = TestContext::new(1, 1000);

    let err = ctx
        .client
        .create_scrape_job(&json!({ "urls": [] }))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("non-empty array"));
    assert!(err.to_string().starts_with("Failed to create a new scrape job: "));

    let err = ctx
        .client
        .create_scrape_job(&json!({ "urls": ["https://a.com", "https://b.com"] }))
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("number of URLs provided (2) exceeds the maximum allowed (1)"));

    let err = ctx
        .client
        .create_scrape_job(&json!({ "urls": ["not-a-url"] }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not-a-url is not a valid URL"));

    let err = ctx
        .client
        .create_scrape_job(&json!({ "urls": ["https://a.com"], "options": { "foo": 1 } }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid options: foo"));

    assert!(ctx.job_repo.jobs().is_empty());
    assert!(ctx.publisher.sent().is_empty());
}

/// 发布中途失败：任务保留为 RUNNING，错误带有续投偏移
#[tokio::test]
async fn test_create_scrape_job_partial_publish() {
    let ctx = TestContext::with_publisher(10, 2, MockQueuePublisher::failing_after(2));

    let err = ctx
        .client
        .create_scrape_job(&json!({ "urls": urls(5) }))
        .await
        .unwrap_err();
    assert!(!err.is_validation());
    assert!(err.to_string().starts_with("Failed to create a new scrape job: "));

    match err {
        ScrapeClientError::Operation {
            source:
                SupervisorError::PartialPublish {
                    published_batches,
                    next_batch_offset,
                    ..
                },
            ..
        } => {
            assert_eq!(published_batches, 2);
            assert_eq!(next_batch_offset, 4);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let jobs = ctx.job_repo.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, ScrapeJobStatus::Running);
    assert_eq!(ctx.publisher.sent().len(), 2);
}

/// 创建后查询状态，创建时设置的字段保持一致
#[tokio::test]
async fn test_get_scrape_job_status_round_trip() {
    let ctx = TestContext::new(1, 1000);
    let created = ctx
        .client
        .create_scrape_job(&json!({ "urls": ["https://www.example.com/a"] }))
        .await
        .unwrap();

    let fetched = ctx
        .client
        .get_scrape_job_status(&created.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, created);

    let missing = ctx
        .client
        .get_scrape_job_status(&Uuid::new_v4().to_string())
        .await
        .unwrap();
    assert!(missing.is_none());

    let err = ctx.client.get_scrape_job_status("abc").await.unwrap_err();
    assert_eq!(err.to_string(), "Job ID is required");
}

#[tokio::test]
async fn test_get_scrape_job_status_wraps_store_failures() {
    let ctx = TestContext::new(1, 1000);
    ctx.job_repo.break_store();
    let job_id = Uuid::new_v4().to_string();

    let err = ctx.client.get_scrape_job_status(&job_id).await.unwrap_err();
    assert!(err.to_string().starts_with(&format!(
        "Failed to fetch scrape job status for jobId: {}, message: ",
        job_id
    )));
}

#[tokio::test]
async fn test_get_scrape_jobs_by_date_range() {
    let ctx = TestContext::new(1, 1000);
    ctx.client
        .create_scrape_job(&json!({ "urls": ["https://www.example.com/a"] }))
        .await
        .unwrap();

    // 仓库已损坏时仍返回校验错误，说明校验先于任何存储调用
    ctx.job_repo.break_store();
    let err = ctx
        .client
        .get_scrape_jobs_by_date_range("not-iso", "2024-01-01")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Invalid request: startDate and endDate must be in ISO 8601 format"
    );
    ctx.job_repo.repair_store();

    let jobs = ctx
        .client
        .get_scrape_jobs_by_date_range("2000-01-01T00:00:00.000Z", "2999-01-01T00:00:00.000Z")
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);

    ctx.job_repo.break_store();
    let err = ctx
        .client
        .get_scrape_jobs_by_date_range("2000-01-01T00:00:00.000Z", "2999-01-01T00:00:00.000Z")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with(
        "Failed to fetch scrape jobs between startDate: 2000-01-01T00:00:00.000Z and endDate: 2999-01-01T00:00:00.000Z, "
    ));
}

#[tokio::test]
async fn test_url_results_and_result_paths() {
    let ctx = TestContext::new(3, 1000);
    let created = ctx
        .client
        .create_scrape_job(&json!({
            "urls": ["https://www.example.com/a", "https://www.example.com/b", "https://www.example.com/c"]
        }))
        .await
        .unwrap();
    let job = ctx.job_repo.jobs().remove(0);

    ctx.url_repo.record(
        &job,
        "https://www.example.com/a",
        ScrapeUrlStatus::Complete,
        None,
        Some("scrapes/a/scrape.json"),
    );
    ctx.url_repo.record(
        &job,
        "https://www.example.com/b",
        ScrapeUrlStatus::Failed,
        Some("timeout"),
        None,
    );
    ctx.url_repo.record(
        &job,
        "https://www.example.com/c",
        ScrapeUrlStatus::Redirect,
        None,
        None,
    );

    let job_id = created.id.to_string();
    let results = ctx
        .client
        .get_scrape_job_url_results(&job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[1].status, ScrapeUrlStatus::Failed);
    assert_eq!(results[1].reason.as_deref(), Some("timeout"));

    let paths = ctx
        .client
        .get_scrape_result_paths(&job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(
        paths["https://www.example.com/a"].as_deref(),
        Some("scrapes/a/scrape.json")
    );

    let unknown = Uuid::new_v4().to_string();
    assert!(ctx
        .client
        .get_scrape_job_url_results(&unknown)
        .await
        .unwrap()
        .is_none());
    assert!(ctx
        .client
        .get_scrape_result_paths(&unknown)
        .await
        .unwrap()
        .is_none());

    let err = ctx
        .client
        .get_scrape_job_url_results("invalid")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to fetch the scrape job result: jobId must be a valid UUID"
    );
}

#[tokio::test]
async fn test_get_scrape_jobs_by_base_url() {
    let ctx = TestContext::new(1, 1000);
    ctx.client
        .create_scrape_job(&json!({ "urls": ["https://example.com/a"] }))
        .await
        .unwrap();
    ctx.client
        .create_scrape_job(&json!({ "urls": ["https://example.com/b"], "processingType": "form" }))
        .await
        .unwrap();

    let encoded = urlencoding::encode("https://example.com").into_owned();
    let all = ctx
        .client
        .get_scrape_jobs_by_base_url(&encoded, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let forms = ctx
        .client
        .get_scrape_jobs_by_base_url(&encoded, Some("form"))
        .await
        .unwrap();
    assert_eq!(forms.len(), 1);

    let none = ctx
        .client
        .get_scrape_jobs_by_base_url(&urlencoding::encode("https://nothing.example.com"), None)
        .await
        .unwrap();
    assert!(none.is_empty());

    let err = ctx
        .client
        .get_scrape_jobs_by_base_url("not-a-url", Some("form"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Failed to fetch scrape jobs by baseURL: not-a-url and processing type: form, Invalid request: baseURL must be a valid URL"
    );
}

#[tokio::test]
async fn test_get_scrape_jobs_by_base_url_rejects_undecodable_input() {
    let ctx = TestContext::new(1, 1000);
    ctx.job_repo.break_store();

    // %FF 解码后不是合法 UTF-8
    let err = ctx
        .client
        .get_scrape_jobs_by_base_url("https%3A%2F%2Fexample.com%2F%FF", None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Failed to fetch scrape jobs by baseURL: https%3A%2F%2Fexample.com%2F%FF, Invalid request: baseURL must be a valid URL"
    );
}
