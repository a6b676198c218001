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

use scrapevisor::application::ScrapeClient;
use scrapevisor::config::settings::Settings;
use scrapevisor::config::ScrapeJobConfiguration;
use scrapevisor::infrastructure::database::connection;
use scrapevisor::infrastructure::metrics;
use scrapevisor::infrastructure::redis_client::RedisClient;
use scrapevisor::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use scrapevisor::infrastructure::repositories::scrape_url_repo_impl::ScrapeUrlRepositoryImpl;
use scrapevisor::presentation::routes;
use scrapevisor::queue::publisher::RedisQueuePublisher;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use scrapevisor::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(settings.telemetry.json);
    info!("Starting scrapevisor...");

    // Initialize Prometheus Metrics
    if settings.metrics.enabled {
        let addr: SocketAddr = settings.metrics.listen_addr.parse()?;
        metrics::init_metrics(addr);
    }

    // 3. Parse scrape job configuration
    let scrape_configuration =
        ScrapeJobConfiguration::load(settings.scrape.job_configuration.as_deref())?;
    info!(
        queue = %scrape_configuration.scrape_worker_queue,
        max_urls_per_job = scrape_configuration.max_urls_per_job(),
        max_urls_per_message = scrape_configuration.max_urls_per_message(),
        "Scrape job configuration loaded"
    );

    // 4. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 5. Initialize Redis Client
    let redis_client = RedisClient::new(&settings.redis.url).await?;
    redis_client.ping().await?;
    info!("Redis client initialized");

    // 6. Initialize Components
    let job_repo = Arc::new(ScrapeJobRepositoryImpl::new(db.clone()));
    let url_repo = Arc::new(ScrapeUrlRepositoryImpl::new(db.clone()));
    let publisher = Arc::new(RedisQueuePublisher::new(redis_client));
    let client = Arc::new(ScrapeClient::new(
        job_repo,
        url_repo,
        publisher,
        scrape_configuration,
    ));

    // 7. Start HTTP server
    let app = routes::routes(client).layer(TraceLayer::new_for_http());

    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
