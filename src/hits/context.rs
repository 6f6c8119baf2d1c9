//! 访问上下文
//!
//! `VisitContext` 描述一次访问（来自请求或由调用方构造），
//! `HitOverrides` 逐字段覆盖上下文中的值。

use std::net::IpAddr;

use actix_web::HttpRequest;
use actix_web::http::header;

use crate::hits::HittableRef;
use crate::storage::NewHit;
use crate::utils::ip::extract_client_ip;

pub const DEFAULT_METHOD: &str = "GET";

/// 一次访问的请求信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitContext {
    pub ip: IpAddr,
    pub user_agent: String,
    pub method: String,
    pub referer: Option<String>,
    pub url: Option<String>,
    pub user_id: Option<i64>,
}

impl VisitContext {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            user_agent: String::new(),
            method: DEFAULT_METHOD.to_string(),
            referer: None,
            url: None,
            user_id: None,
        }
    }

    /// 从 actix-web 请求构造
    ///
    /// 客户端 IP 按 `trusted_proxies` 规则解析，无法确定时返回 `None`。
    /// `user_id` 需要调用方通过 `with_user` 设置。
    pub fn from_request(req: &HttpRequest, trusted_proxies: &[String]) -> Option<Self> {
        let ip = extract_client_ip(req, trusted_proxies)?;
        let headers = req.headers();

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let referer = headers
            .get(header::REFERER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(String::from);

        let conn = req.connection_info();
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}://{}{}", conn.scheme(), conn.host(), path);

        Some(Self {
            ip,
            user_agent,
            method: req.method().as_str().to_string(),
            referer,
            url: Some(url),
            user_id: None,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_user(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// 逐字段覆盖 `VisitContext`
///
/// 可空字段使用 `Option<Option<_>>`：外层 `Some(None)` 表示显式清空。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitOverrides {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
    pub method: Option<String>,
    pub referer: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub user_id: Option<Option<i64>>,
}

impl HitOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn referer(mut self, referer: Option<String>) -> Self {
        self.referer = Some(referer);
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = Some(url);
        self
    }

    pub fn user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// 合并出实际写入的字段
    pub fn apply(&self, target: &HittableRef, visit: &VisitContext) -> NewHit {
        NewHit {
            target: target.clone(),
            ip: self.ip.unwrap_or(visit.ip),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| visit.user_agent.clone()),
            user_id: self.user_id.unwrap_or(visit.user_id),
            referer: self
                .referer
                .clone()
                .unwrap_or_else(|| visit.referer.clone()),
            method: self.method.clone().unwrap_or_else(|| visit.method.clone()),
            url: self.url.clone().unwrap_or_else(|| visit.url.clone()),
        }
    }
}
