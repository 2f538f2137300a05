//! Shadowsocks SIP003 plugins.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Plugin attached to a Shadowsocks proxy, serialized as `plugin` + `plugin-opts`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "PluginRepr", into = "PluginRepr")]
pub enum SsPlugin {
    #[default]
    None,
    /// simple-obfs / obfs-local
    Obfs(ObfsPluginOpts),
    /// v2ray-plugin
    V2ray(V2rayPluginOpts),
    /// shadow-tls
    ShadowTls(ShadowTlsPluginOpts),
    /// Any other plugin, kept with its options as written
    Other {
        name: String,
        opts: Option<serde_json::Value>,
    },
}

impl SsPlugin {
    pub fn name(&self) -> Option<&str> {
        match self {
            SsPlugin::None => None,
            SsPlugin::Obfs(_) => Some("obfs"),
            SsPlugin::V2ray(_) => Some("v2ray-plugin"),
            SsPlugin::ShadowTls(_) => Some("shadow-tls"),
            SsPlugin::Other { name, .. } => Some(name.as_str()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SsPlugin::None)
    }
}

/// simple-obfs options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObfsPluginOpts {
    /// `http` or `tls`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// v2ray-plugin options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct V2rayPluginOpts {
    /// Always `websocket` for links; records may say otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mux: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,
}

/// shadow-tls options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShadowTlsPluginOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
}

// ============================================================================
// Wire Representation
// ============================================================================

#[derive(Serialize, Deserialize, Default)]
struct PluginRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plugin: Option<String>,

    #[serde(default, rename = "plugin-opts", skip_serializing_if = "Option::is_none")]
    plugin_opts: Option<serde_json::Value>,
}

fn opts_from_value<T>(value: Option<serde_json::Value>) -> Result<T, ParseError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match value {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| ParseError::MalformedInput {
            format: "ss plugin-opts",
            reason: e.to_string(),
        }),
    }
}

impl TryFrom<PluginRepr> for SsPlugin {
    type Error = ParseError;

    fn try_from(repr: PluginRepr) -> Result<Self, Self::Error> {
        let Some(plugin) = repr.plugin else {
            return Ok(SsPlugin::None);
        };
        match plugin.as_str() {
            "obfs" | "obfs-local" | "simple-obfs" => {
                Ok(SsPlugin::Obfs(opts_from_value(repr.plugin_opts)?))
            }
            "v2ray-plugin" => Ok(SsPlugin::V2ray(opts_from_value(repr.plugin_opts)?)),
            "shadow-tls" => Ok(SsPlugin::ShadowTls(opts_from_value(repr.plugin_opts)?)),
            _ => Ok(SsPlugin::Other {
                name: plugin,
                opts: repr.plugin_opts,
            }),
        }
    }
}

/// Typed opts with nothing set produce no `plugin-opts` key
fn opts_to_value<T: Serialize + Default + PartialEq>(opts: T) -> Option<serde_json::Value> {
    if opts == T::default() {
        return None;
    }
    serde_json::to_value(opts).ok()
}

impl From<SsPlugin> for PluginRepr {
    fn from(plugin: SsPlugin) -> Self {
        let name = plugin.name().map(str::to_string);
        let opts = match plugin {
            SsPlugin::None => None,
            SsPlugin::Obfs(opts) => opts_to_value(opts),
            SsPlugin::V2ray(opts) => opts_to_value(opts),
            SsPlugin::ShadowTls(opts) => opts_to_value(opts),
            SsPlugin::Other { opts, .. } => opts,
        };
        PluginRepr {
            plugin: name,
            plugin_opts: opts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        #[serde(flatten)]
        plugin: SsPlugin,
    }

    #[test]
    fn test_obfs_serializes_as_plugin_pair() {
        let holder = Holder {
            plugin: SsPlugin::Obfs(ObfsPluginOpts {
                mode: Some("http".to_string()),
                host: Some("bing.com".to_string()),
            }),
        };
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            json!({"plugin": "obfs", "plugin-opts": {"mode": "http", "host": "bing.com"}})
        );
    }

    #[test]
    fn test_no_plugin_no_keys() {
        let holder = Holder {
            plugin: SsPlugin::None,
        };
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({}));
    }

    #[test]
    fn test_v2ray_plugin_from_record() {
        let holder: Holder = serde_json::from_value(json!({
            "plugin": "v2ray-plugin",
            "plugin-opts": {"mode": "websocket", "tls": true, "host": "a.example.com"}
        }))
        .unwrap();
        match holder.plugin {
            SsPlugin::V2ray(opts) => {
                assert_eq!(opts.mode.as_deref(), Some("websocket"));
                assert_eq!(opts.tls, Some(true));
            }
            other => panic!("Expected v2ray-plugin, got {:?}", other),
        }
    }

    #[test]
    fn test_obfs_without_options_has_no_opts_key() {
        let holder = Holder {
            plugin: SsPlugin::Obfs(ObfsPluginOpts::default()),
        };
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({"plugin": "obfs"}));
    }

    #[test]
    fn test_unknown_plugin_kept() {
        let record = json!({"plugin": "kcptun", "plugin-opts": {"mode": "fast", "crypt": "aes"}});
        let holder: Holder = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(
            holder.plugin,
            SsPlugin::Other {
                name: "kcptun".to_string(),
                opts: Some(json!({"mode": "fast", "crypt": "aes"})),
            }
        );
        assert_eq!(holder.plugin.name(), Some("kcptun"));
        assert_eq!(serde_json::to_value(&holder).unwrap(), record);
    }
}
