// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 抓取客户端及其请求/响应数据传输对象。
/// 该层负责请求校验与DTO转换，业务编排委托给领域层的监督器。
pub mod dto;
pub mod scrape_client;

pub use scrape_client::{ScrapeClient, ScrapeClientError};
