// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 单条队列消息默认最多携带的 URL 数
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// 将有序列表切分为连续批次
///
/// 每个批次长度不超过 `batch_size`，按顺序拼接所有批次即得到原列表。
/// 空输入返回空结果；`batch_size` 为 0 时按 1 处理。
///
/// # 参数
///
/// * `items` - 待切分的列表
/// * `batch_size` - 批次上限
///
/// # 返回值
///
/// 借用原列表的批次切片
pub fn split_into_batches<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    items.chunks(batch_size.max(1)).collect()
}
