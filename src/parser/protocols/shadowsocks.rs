//! Shadowsocks protocol parser
//!
//! This module provides parsing for Shadowsocks (ss://) URIs.
//! Supports both SIP002 format and legacy format, as well as SIP003 plugins.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::base64::decode_base64_str;
use crate::parser::canonical::translate_plugin;
use crate::parser::helpers::{default_name, is_flag_on, parse_port, parse_query, percent_decode};
use crate::proxy::{Proxy, ProxyType, SsPlugin, SsProxy, V2rayPluginOpts};

use super::strip_scheme;

const FORMAT: &str = "ss";

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) URIs
///
/// - SIP002: ss://BASE64(method:password)@host:port#tag
/// - SIP002 with userinfo: ss://method:password@host:port#tag
/// - SIP002 with SIP003 plugin: ss://userinfo@host:port/?plugin=plugin-name;plugin-opts#tag
/// - Legacy: ss://BASE64(method:password@host:port)?v2ray-plugin=BASE64(JSON)#tag
pub struct ShadowsocksParser;

impl ProxyParser for ShadowsocksParser {
    fn name(&self) -> &str {
        "URI SS Parser"
    }

    fn test(&self, line: &str) -> bool {
        line.starts_with("ss://")
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Shadowsocks URI");
        let without_scheme = strip_scheme(line.trim(), &["ss"])
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing ss:// prefix"))?;

        let (content, fragment) = match without_scheme.split_once('#') {
            Some((content, fragment)) => (content, Some(fragment)),
            None => (without_scheme, None),
        };
        let (body, query) = match content.split_once('?') {
            Some((body, query)) => (body, Some(query)),
            None => (content, None),
        };
        let body = body.trim_end_matches('/');

        let (userinfo, hostport) = match body.rfind('@') {
            Some(at_pos) => {
                trace!("Parsing as SIP002 format (found @ separator)");
                let (method, password) = parse_userinfo(&body[..at_pos])?;
                ((method, password), body[at_pos + 1..].to_string())
            }
            None => {
                trace!("Parsing as legacy Base64 format");
                let decoded = decode_base64_str(body)?;
                let at_pos = decoded
                    .rfind('@')
                    .ok_or_else(|| ParseError::malformed(FORMAT, "legacy content missing @"))?;
                let (method, password) = split_method_password(&decoded[..at_pos])?;
                ((method, password), decoded[at_pos + 1..].to_string())
            }
        };
        let (cipher, password) = userinfo;
        let (server, port) = split_server_port(&hostport)?;

        let params = query.map(parse_query).unwrap_or_default();
        let plugin = parse_plugin(&params)?;

        let name = fragment
            .map(percent_decode)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(ProxyType::Ss, &server, port));

        let mut proxy = SsProxy {
            name,
            server,
            port,
            cipher,
            password,
            plugin,
            ..Default::default()
        };

        if let Some(query) = query {
            if flag_in_query(query, "uot") {
                proxy.udp_over_tcp = true;
            }
            if flag_in_query(query, "tfo") {
                proxy.common.tfo = Some(true);
            }
        }

        Ok(Proxy::Ss(proxy))
    }
}

/// Decodes userinfo, which might be Base64 or plain `method:password`
fn parse_userinfo(userinfo: &str) -> Result<(String, String)> {
    if let Ok(decoded) = decode_base64_str(userinfo)
        && decoded.contains(':')
    {
        trace!("Decoded Base64 userinfo");
        return split_method_password(&decoded);
    }
    split_method_password(&percent_decode(userinfo))
}

fn split_method_password(s: &str) -> Result<(String, String)> {
    let (method, password) = s
        .split_once(':')
        .ok_or_else(|| ParseError::malformed(FORMAT, "userinfo missing method:password"))?;
    if method.is_empty() {
        return Err(ParseError::malformed(FORMAT, "missing cipher"));
    }
    Ok((method.to_string(), password.to_string()))
}

/// Splits `host:port`; the port is the first run of digits after the last `:`
fn split_server_port(hostport: &str) -> Result<(String, u16)> {
    let colon_pos = hostport
        .rfind(':')
        .ok_or_else(|| ParseError::malformed(FORMAT, "missing port"))?;
    let host = &hostport[..colon_pos];
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return Err(ParseError::malformed(FORMAT, "missing server"));
    }

    let tail = &hostport[colon_pos + 1..];
    let digits: String = tail
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let port = parse_port(FORMAT, &digits)?;
    Ok((host.to_string(), port))
}

/// Resolves the plugin from `plugin=` or the legacy `v2ray-plugin=` parameter
fn parse_plugin(params: &HashMap<String, String>) -> Result<SsPlugin> {
    let mut plugin = SsPlugin::None;

    if let Some(encoded) = params.get("v2ray-plugin") {
        let json = decode_base64_str(encoded)?;
        let opts: V2rayPluginOpts = serde_json::from_str(&json)
            .map_err(|e| ParseError::malformed(FORMAT, format!("invalid v2ray-plugin options: {}", e)))?;
        trace!("Legacy v2ray-plugin options: {:?}", opts);
        plugin = SsPlugin::V2ray(opts);
    }

    if let Some(spec) = params.get("plugin").filter(|s| !s.is_empty()) {
        plugin = translate_plugin(spec)?;
    }

    Ok(plugin)
}

/// Matches `(&|?)<key>=(1|true)` in the raw query
fn flag_in_query(query: &str, key: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(k, v)| k.eq_ignore_ascii_case(key) && is_flag_on(Some(v)))
}
