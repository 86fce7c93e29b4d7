// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::services::team_routing::RoutingTargets;

/// 应用程序配置设置
///
/// 包含数据库、服务器、默认路由、分页与指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 新工单的默认团队路由
    #[serde(default)]
    pub routing: RoutingSettings,
    /// 列表分页配置
    pub pagination: PaginationSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 是否输出 SQL 日志
    pub sqlx_logging: bool,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 默认团队路由配置
///
/// 未配置的目标表示不路由，工单保持未分配
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingSettings {
    /// 普通用户提交的工单进入的团队
    pub it_team_id: Option<Uuid>,
    /// 服务人员提交的工单进入的团队
    pub lms_team_id: Option<Uuid>,
}

impl RoutingSettings {
    pub fn targets(&self) -> RoutingTargets {
        RoutingTargets {
            it_team_id: self.it_team_id,
            lms_team_id: self.lms_team_id,
        }
    }
}

/// 分页配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    /// 未指定时的每页条数
    pub default_limit: u64,
    /// 每页条数上限
    pub max_limit: u64,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、config/default、config/{APP_ENVIRONMENT} 与 WORKDESK__ 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("WORKDESK").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用默认值与指定数据库地址，不读取文件与环境变量
    pub fn for_database(url: &str) -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .set_override("database.url", url)?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://workdesk.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.sqlx_logging", false)?
            .set_default("pagination.default_limit", 10)?
            .set_default("pagination.max_limit", 100)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
