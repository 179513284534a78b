//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The JSON API is rate limited per client IP (~100 requests per minute).
//! HTML pages are not limited.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key used when neither proxy headers nor the peer address are available.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor keyed on the client IP.
///
/// The peer address recorded by `into_make_service_with_connect_info` is used
/// unless `trust_proxy_headers` is set, in which case `X-Forwarded-For` (first
/// hop) and `X-Real-IP` take precedence. Only enable that behind a proxy that
/// overwrites those headers; otherwise clients can pick their own key.
///
/// Clients with no identifiable address share a single bucket.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        // X-Forwarded-For (first IP in the chain)
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = Self::forwarded_ip(req)
        {
            return Ok(ip);
        }

        Ok(req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or(UNKNOWN_CLIENT, |ConnectInfo(addr)| addr.ip()))
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the JSON API: ~100 requests per minute per IP.
///
/// Configuration: 1 request per second (replenish), burst of 50.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(1)` and `burst_size(50)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(header: Option<(&str, &str)>) -> Request<()> {
        let mut builder = Request::builder().uri("/api/stores");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(()).unwrap()
    }

    const TRUSTED: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: true,
    };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: false,
    };

    fn with_peer(mut req: Request<()>, ip: [u8; 4]) -> Request<()> {
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 5000))));
        req
    }

    #[test]
    fn test_forwarded_for_takes_first_hop_when_trusted() {
        let req = request(Some(("x-forwarded-for", "203.0.113.7, 10.0.0.1")));
        assert_eq!(
            TRUSTED.extract(&req).unwrap(),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );

        let req = request(Some(("x-real-ip", "198.51.100.9")));
        assert_eq!(
            TRUSTED.extract(&req).unwrap(),
            "198.51.100.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_forwarded_headers_ignored_by_default() {
        let req = with_peer(
            request(Some(("x-forwarded-for", "203.0.113.7"))),
            [192, 0, 2, 4],
        );
        assert_eq!(
            DIRECT.extract(&req).unwrap(),
            "192.0.2.4".parse::<IpAddr>().unwrap()
        );

        let req = request(Some(("x-real-ip", "198.51.100.9")));
        assert_eq!(DIRECT.extract(&req).unwrap(), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_peer_address_fallback() {
        let req = with_peer(request(None), [192, 0, 2, 4]);
        assert_eq!(
            TRUSTED.extract(&req).unwrap(),
            "192.0.2.4".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_unknown_client_shares_bucket() {
        assert_eq!(TRUSTED.extract(&request(None)).unwrap(), UNKNOWN_CLIENT);
        assert_eq!(DIRECT.extract(&request(None)).unwrap(), UNKNOWN_CLIENT);
    }
}
