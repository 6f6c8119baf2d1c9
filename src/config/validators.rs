//! 配置值验证模块
//!
//! 启动时检查 `[hits]` 配置，任何一项不合法都拒绝启动。

use std::net::IpAddr;

use super::HitsConfig;
use crate::utils::ip::parse_cidr;

/// 验证访问记录配置
///
/// 返回全部错误，而不是遇到第一个就停止。
pub fn validate_hits_config(config: &HitsConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = config.utc_offset() {
        errors.push(e);
    }

    if config
        .bot_user_agents
        .iter()
        .any(|pattern| pattern.trim().is_empty())
    {
        // 空字符串会匹配所有 User-Agent
        errors.push("hits.bot_user_agents must not contain empty patterns".to_string());
    }

    if config.cleanup_batch_size == 0 {
        errors.push("hits.cleanup_batch_size must be greater than 0".to_string());
    }

    for proxy in &config.trusted_proxies {
        let valid = if proxy.contains('/') {
            parse_cidr(proxy).is_some()
        } else {
            proxy.parse::<IpAddr>().is_ok()
        };
        if !valid {
            errors.push(format!("Invalid trusted proxy '{}'", proxy));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
