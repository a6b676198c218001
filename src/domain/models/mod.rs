// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取任务（scrape_job）：一次批量抓取请求及其生命周期状态
/// - 抓取URL记录（scrape_url）：worker 写回的单个URL抓取结果
pub mod scrape_job;
pub mod scrape_url;
