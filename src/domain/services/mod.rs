// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含不依赖存储的纯业务规则：
/// - 访问策略（access_policy）：列表可见范围与单项访问权限
/// - 分配服务（assignment_service）：分配意图识别、角色校验与分配计划
/// - 审计（audit）：活动日志与通知内容
/// - 编号（numbering）：工单与任务的显示编号
/// - 团队路由（team_routing）：新工作项的初始分配
///
/// 服务产出的计划与日志由仓库实现在单个事务中落库。
pub mod access_policy;
pub mod assignment_service;
pub mod audit;
pub mod numbering;
pub mod team_routing;
