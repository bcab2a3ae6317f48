// API layer - HTTP endpoints
pub mod health;
pub mod jurisdiction;
pub mod signup;

use std::net::IpAddr;

use poem::Request;

pub use health::HealthApi;
pub use jurisdiction::JurisdictionApi;
pub use signup::SignupApi;

pub trait Api {
    fn extract_ip_address(&self, req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
