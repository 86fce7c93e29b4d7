// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的SeaORM实现
mod activity_writer;
pub mod comment_repo_impl;
pub mod directory_repo_impl;
pub mod time_log_repo_impl;
pub mod work_item_repo_impl;
