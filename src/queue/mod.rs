// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供批次切分、队列消息格式与消息发布抽象
/// 负责把抓取任务的 URL 分批投递给外部 worker
pub mod batch;
pub mod message;
pub mod publisher;
