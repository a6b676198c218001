// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：抓取任务与URL记录
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：抓取任务监督器
///
/// 领域层只依赖抽象接口，存储与队列实现由调用方注入。
pub mod models;
pub mod repositories;
pub mod services;
