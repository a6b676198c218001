// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括数据库、Redis、服务器与抓取任务配置
pub mod scrape_job;
pub mod settings;


pub use scrape_job::{ConfigurationError, ScrapeJobConfiguration};
