// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 抓取任务仓库（scrape_job_repository）：任务的创建与查询
/// - 抓取 URL 仓库（scrape_url_repository）：worker 写入的逐 URL 结果查询
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 测试时可以替换为内存实现。
pub mod scrape_job_repository;
pub mod scrape_url_repository;
