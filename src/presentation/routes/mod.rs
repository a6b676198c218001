// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::ScrapeClient;
use crate::domain::repositories::{
    scrape_job_repository::ScrapeJobRepository, scrape_url_repository::ScrapeUrlRepository,
};
use crate::presentation::handlers::scrape_job_handler;
use crate::queue::publisher::QueuePublisher;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

/// 创建应用路由
///
/// # 参数
///
/// * `client` - 抓取客户端，以 `Extension` 注入各处理器
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<J, U, Q>(client: Arc<ScrapeClient<J, U, Q>>) -> Router
where
    J: ScrapeJobRepository + 'static,
    U: ScrapeUrlRepository + 'static,
    Q: QueuePublisher + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scrape_routes = Router::new()
        .route(
            "/v1/scrape/jobs",
            post(scrape_job_handler::create_scrape_job::<J, U, Q>)
                .get(scrape_job_handler::list_scrape_jobs::<J, U, Q>),
        )
        .route(
            "/v1/scrape/jobs/{job_id}",
            get(scrape_job_handler::get_scrape_job::<J, U, Q>),
        )
        .route(
            "/v1/scrape/jobs/{job_id}/results",
            get(scrape_job_handler::get_scrape_job_results::<J, U, Q>),
        )
        .route(
            "/v1/scrape/jobs/{job_id}/paths",
            get(scrape_job_handler::get_scrape_result_paths::<J, U, Q>),
        )
        .route(
            "/v1/scrape/jobs/by-base-url/{base_url}",
            get(scrape_job_handler::list_scrape_jobs_by_base_url::<J, U, Q>),
        )
        .route(
            "/v1/scrape/jobs/by-base-url/{base_url}/{processing_type}",
            get(scrape_job_handler::list_scrape_jobs_by_base_url_and_processing_type::<J, U, Q>),
        )
        .layer(Extension(client));

    Router::new().merge(public_routes).merge(scrape_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
