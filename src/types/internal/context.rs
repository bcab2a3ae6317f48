use std::net::IpAddr;
use uuid::Uuid;

/// Per-request metadata threaded through coordinators for tracing.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub ip_address: Option<IpAddr>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            ip_address: None,
        }
    }

    pub fn with_ip(ip_address: Option<IpAddr>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            ip_address,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
