// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scrapevisor::queue::publisher::{QueueError, QueuePublisher};
use serde_json::Value;
use std::sync::Mutex;

/// 一次发送记录
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub queue_url: String,
    pub body: Value,
    pub message_group_id: Option<String>,
}

/// 记录型队列发布者
///
/// 把消息保存在内存中；设置 `fail_after` 后，第 n 次之后的发送全部失败
pub struct MockQueuePublisher {
    sent: Mutex<Vec<SentMessage>>,
    fail_after: Option<usize>,
}

impl MockQueuePublisher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    pub fn failing_after(successful_sends: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_after: Some(successful_sends),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueuePublisher for MockQueuePublisher {
    async fn send_message(
        &self,
        queue_url: &str,
        body: &Value,
        message_group_id: Option<String>,
    ) -> Result<(), QueueError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|limit| sent.len() >= limit) {
            return Err(QueueError::Transport("queue unavailable".to_string()));
        }
        sent.push(SentMessage {
            queue_url: queue_url.to_string(),
            body: body.clone(),
            message_group_id,
        });
        Ok(())
    }
}
