// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 工作项（work_item）：工单与任务共享的实体、状态与领域错误
/// - 用户（user）：角色、调用者与目录摘要
/// - 活动（activity）：审计日志与通知
/// - 计时（time_log）：工时记录
/// - 评论（comment）：工作项评论
pub mod activity;
pub mod comment;
pub mod time_log;
pub mod user;
pub mod work_item;
