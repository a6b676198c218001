// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 负责处理HTTP请求和响应，包括错误映射、请求处理器与路由
pub mod errors;
pub mod handlers;
pub mod routes;
