// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 定义数据库表对应的实体结构
/// 使用SeaORM框架进行对象关系映射
pub mod activity_log;
pub mod category;
pub mod comment;
pub mod notification;
pub mod project;
pub mod session;
pub mod team;
pub mod time_log;
pub mod user;
pub mod work_item;
pub mod work_item_assignee;
pub mod work_item_sequence;
