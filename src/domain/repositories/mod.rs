// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 评论仓库（comment_repository）：评论的写入与读取
/// - 目录仓库（directory_repository）：用户、团队与分类的只读访问
/// - 计时仓库（time_log_repository）：计时的启动、停止与查询
/// - 工作项仓库（work_item_repository）：工作项、受理人与活动日志
pub mod comment_repository;
pub mod directory_repository;
pub mod time_log_repository;
pub mod work_item_repository;
