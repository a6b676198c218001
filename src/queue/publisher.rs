// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::redis_client::RedisClient;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 消息无法序列化
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 传输层错误
    #[error("Queue transport error: {0}")]
    Transport(String),
}

/// 队列发布者特质
///
/// 即发即忘的消息投递抽象。`message_group_id` 是分区提示，
/// 具体传输可以用它来保持同组消息的顺序。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// 发送一条 JSON 消息
    async fn send_message(
        &self,
        queue_url: &str,
        body: &Value,
        message_group_id: Option<String>,
    ) -> Result<(), QueueError>;
}

/// 基于 Redis 列表的队列发布者
///
/// 以队列URL为列表键，RPUSH 一个 `{messageGroupId, body}` 信封，
/// worker 端用 BLPOP 按入队顺序消费
pub struct RedisQueuePublisher {
    /// Redis客户端
    client: RedisClient,
}

impl RedisQueuePublisher {
    /// 创建新的 Redis 队列发布者
    ///
    /// # 参数
    ///
    /// * `client` - Redis客户端
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn envelope(body: &Value, message_group_id: Option<String>) -> Value {
        json!({
            "messageGroupId": message_group_id,
            "body": body,
        })
    }
}

#[async_trait]
impl QueuePublisher for RedisQueuePublisher {
    async fn send_message(
        &self,
        queue_url: &str,
        body: &Value,
        message_group_id: Option<String>,
    ) -> Result<(), QueueError> {
        let payload = serde_json::to_string(&Self::envelope(body, message_group_id))?;
        self.client
            .rpush(queue_url, &payload)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl<T: QueuePublisher + ?Sized> QueuePublisher for Arc<T> {
    async fn send_message(
        &self,
        queue_url: &str,
        body: &Value,
        message_group_id: Option<String>,
    ) -> Result<(), QueueError> {
        (**self).send_message(queue_url, body, message_group_id).await
    }
}
