// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 抓取任务监督器（scrape_job_supervisor）：任务创建、批次切分与队列发布，以及任务/URL查询
pub mod scrape_job_supervisor;
