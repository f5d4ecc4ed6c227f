use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::OnceLock,
};

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

use crate::config::ServerOptions;

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration. Only the first
///    (client) entry is used.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, options: ServerOptions) -> Option<IpAddr> {
    let mut result = None;
    if options.use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(parse_ip);
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if options.use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req.headers().get("Forwarded").and_then(|v| v.to_str().ok()).and_then(forwarded_for);
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.connection_info().peer_addr().map(|a| a.to_string());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr.as_deref().and_then(parse_ip)
    })
}

/// Extracts the first `for=` address from a `Forwarded` header value (RFC 7239).
fn forwarded_for(header: &str) -> Option<IpAddr> {
    static FOR_PARAM: OnceLock<Option<Regex>> = OnceLock::new();
    let re = FOR_PARAM.get_or_init(|| Regex::new(r#"(?i)for=(?P<ip>[^;,]+)"#).ok()).as_ref()?;
    re.captures(header).and_then(|caps| caps.name("ip")).and_then(|m| parse_ip(m.as_str()))
}

/// Parses a bare IP address, an `ip:port` pair, or either of those in quotes or brackets.
fn parse_ip(s: &str) -> Option<IpAddr> {
    let s = s.trim().trim_matches('"');
    IpAddr::from_str(s)
        .ok()
        .or_else(|| SocketAddr::from_str(s).ok().map(|a| a.ip()))
        .or_else(|| IpAddr::from_str(s.trim_start_matches('[').trim_end_matches(']')).ok())
}
