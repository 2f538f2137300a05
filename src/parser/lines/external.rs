//! Surge external proxy program lines
//!
//! `name = external, exec = "/usr/local/bin/ss-local", args = "-c", args = "conf.json", local-port = 1080, addresses = 1.2.3.4`

use std::net::IpAddr;

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::fields::{find_value, find_values, split_fields, strip_delimiters, type_token};
use crate::parser::helpers::{get_if_not_blank, is_ip};
use crate::proxy::{ExternalProxy, Proxy};

use super::detect;

const FORMAT: &str = "external";

/// Parser for Surge `external` lines
pub struct SurgeExternalParser;

impl ProxyParser for SurgeExternalParser {
    fn name(&self) -> &str {
        "Surge External Parser"
    }

    fn test(&self, line: &str) -> bool {
        detect::surge_external(line)
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Surge external line");
        let line = line.trim();
        let (name, kind) =
            type_token(line).ok_or_else(|| ParseError::malformed(FORMAT, "missing name"))?;
        if kind != "external" {
            return Err(ParseError::malformed(FORMAT, format!("unexpected type {:?}", kind)));
        }

        let fields = split_fields(line);
        let fields = &fields[1..];

        let addresses = find_values(fields, "addresses")
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.trim();
                let address = strip_delimiters(raw, '[', ']').unwrap_or(raw);
                if !is_ip(address) {
                    trace!("Skipping non-IP external address: {}", raw);
                    return None;
                }
                address.parse::<IpAddr>().ok()
            })
            .collect();

        Ok(Proxy::External(ExternalProxy {
            name: name.to_string(),
            exec: get_if_not_blank(find_value(fields, "exec")),
            local_port: get_if_not_blank(find_value(fields, "local-port")),
            args: find_values(fields, "args")
                .into_iter()
                .map(str::to_string)
                .collect(),
            addresses,
            ..Default::default()
        }))
    }
}
