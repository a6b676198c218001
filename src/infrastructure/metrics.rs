// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 新建抓取任务计数
pub const SCRAPE_JOBS_CREATED: &str = "scrape_jobs_created_total";
/// 已发布队列消息计数（标签 `processing_type`）
pub const SCRAPE_QUEUE_MESSAGES_PUBLISHED: &str = "scrape_queue_messages_published_total";
/// 队列发布失败计数
pub const SCRAPE_QUEUE_PUBLISH_FAILURES: &str = "scrape_queue_publish_failures_total";

/// 初始化指标系统
///
/// 安装 Prometheus 导出器并注册抓取相关指标
///
/// # 参数
///
/// * `addr` - 导出器监听地址
pub fn init_metrics(addr: SocketAddr) {
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

/// 注册指标说明
pub fn describe_metrics() {
    describe_counter!(SCRAPE_JOBS_CREATED, "Total number of scrape jobs created");
    describe_counter!(
        SCRAPE_QUEUE_MESSAGES_PUBLISHED,
        "Total number of batch messages published to the scrape worker queue"
    );
    describe_counter!(
        SCRAPE_QUEUE_PUBLISH_FAILURES,
        "Total number of failed batch publications"
    );
}
