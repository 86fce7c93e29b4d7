// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 导出器
///
/// 未启用或地址无效时只记录日志，服务照常运行
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    // Address may already be taken in development
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_assignment(action: &'static str) {
    counter!("workdesk_assignments_total", "action" => action).increment(1);
}

pub fn record_work_item_created(item_type: &'static str) {
    counter!("workdesk_work_items_created_total", "type" => item_type).increment(1);
}

pub fn record_timer_started() {
    counter!("workdesk_timers_started_total").increment(1);
}
