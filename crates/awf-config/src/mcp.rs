//! MCP server configurations derived from workflow `tools`.

use crate::error::McpError;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Version of the GitHub MCP server image used when none is configured.
pub const DEFAULT_GITHUB_MCP_VERSION: &str = "sha-09deac4";

pub const GITHUB_MCP_IMAGE: &str = "ghcr.io/github/github-mcp-server";

/// Environment value used when no GitHub token can be obtained.
pub const GITHUB_TOKEN_PLACEHOLDER: &str = "${GITHUB_TOKEN_REQUIRED}";

const GITHUB_TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum McpServerType {
    Stdio,
    Http,
    Docker,
}

impl McpServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpServerType::Stdio => "stdio",
            McpServerType::Http => "http",
            McpServerType::Docker => "docker",
        }
    }
}

impl std::fmt::Display for McpServerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named MCP server, ready to be rendered into an engine's config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpServerConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub server_type: McpServerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
}

impl McpServerConfig {
    fn new(name: &str, server_type: McpServerType) -> Self {
        Self {
            name: name.to_string(),
            server_type,
            command: None,
            args: Vec::new(),
            container: None,
            url: None,
            headers: BTreeMap::new(),
            env: BTreeMap::new(),
            allowed: Vec::new(),
        }
    }

    /// Run `image` through `docker run`, forwarding every env key.
    fn run_container(&mut self, image: &str, extra_args: Vec<String>) {
        let mut args: Vec<String> = vec!["run".into(), "--rm".into(), "-i".into()];
        for key in self.env.keys() {
            args.push("-e".into());
            args.push(key.clone());
        }
        args.push(image.to_string());
        args.extend(extra_args);

        self.command = Some("docker".to_string());
        self.container = Some(image.to_string());
        self.args = args;
    }
}

/// Source of the GitHub token handed to the GitHub MCP server.
pub trait TokenProvider {
    fn token(&self) -> Result<String, String>;
}

/// Reads `GITHUB_TOKEN`, then `GH_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTokenProvider;

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> Result<String, String> {
        ["GITHUB_TOKEN", "GH_TOKEN"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|value| !value.is_empty()))
            .ok_or_else(|| "neither GITHUB_TOKEN nor GH_TOKEN is set".to_string())
    }
}

/// MCP servers declared under `tools` in `frontmatter`, sorted by name.
///
/// `tools.github` always yields the GitHub server. Other tools count only
/// when they carry an MCP type, directly or in an `mcp` section (a map or a
/// JSON string). `filter` keeps only the server with that name.
///
/// # Errors
///
/// Fails when a server's section is malformed, misses a field its type
/// requires, or does not pass the MCP config schema.
pub fn extract_mcp_configurations(
    frontmatter: &Map<String, Value>,
    filter: Option<&str>,
    tokens: &dyn TokenProvider,
) -> Result<Vec<McpServerConfig>, McpError> {
    let Some(tools) = frontmatter.get("tools").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let mut servers = Vec::new();
    for (name, config) in tools {
        if filter.is_some_and(|wanted| wanted != name) {
            continue;
        }
        let empty = Map::new();
        let config = config.as_object().unwrap_or(&empty);

        let server = if name == "github" {
            Some(github_server(config, tokens))
        } else {
            custom_server(name, config)?
        };
        if let Some(server) = server {
            debug!(server = %server.name, server_type = %server.server_type, "extracted MCP server");
            servers.push(server);
        }
    }

    servers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(servers)
}

fn github_server(config: &Map<String, Value>, tokens: &dyn TokenProvider) -> McpServerConfig {
    let version = config
        .get("docker_image_version")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_GITHUB_MCP_VERSION);

    let mut server = McpServerConfig::new("github", McpServerType::Docker);
    let token = tokens.token().unwrap_or_else(|reason| {
        warn!(%reason, "no GitHub token available; using placeholder");
        GITHUB_TOKEN_PLACEHOLDER.to_string()
    });
    server.env.insert(GITHUB_TOKEN_ENV.to_string(), token);
    if config.get("read-only").and_then(Value::as_bool) == Some(true) {
        server.env.insert("GITHUB_READ_ONLY".to_string(), "1".to_string());
    }
    if let Some(toolsets) = config.get("toolsets").and_then(Value::as_array) {
        let names: Vec<&str> = toolsets.iter().filter_map(Value::as_str).collect();
        server.env.insert("GITHUB_TOOLSETS".to_string(), names.join(","));
    }

    server.run_container(&format!("{}:{}", GITHUB_MCP_IMAGE, version), Vec::new());
    server.allowed = string_list(config.get("allowed"));
    server
}

fn custom_server(name: &str, config: &Map<String, Value>) -> Result<Option<McpServerConfig>, McpError> {
    let nested = config.contains_key("mcp");
    let section = match config.get("mcp") {
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(invalid(name, "expected a JSON object")),
            Err(err) => return Err(invalid(name, &err.to_string())),
        },
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(invalid(name, "expected a map or a JSON string")),
        None => config.clone(),
    };

    let Some(type_tag) = section.get("type").and_then(Value::as_str) else {
        return Ok(None);
    };
    let server_type = match type_tag {
        "stdio" => McpServerType::Stdio,
        "http" => McpServerType::Http,
        "docker" => McpServerType::Docker,
        other => {
            return Err(McpError::UnsupportedType {
                server: name.to_string(),
                server_type: other.to_string(),
            });
        }
    };
    awf_schema::validate_mcp_config(&section).map_err(|source| McpError::Validation {
        server: name.to_string(),
        source,
    })?;

    let mut server = McpServerConfig::new(name, server_type);
    server.env = string_map(section.get("env"));
    server.headers = string_map(section.get("headers"));
    let args = string_list(section.get("args"));
    let command = section.get("command").and_then(Value::as_str);
    let container = section.get("container").and_then(Value::as_str);

    match server_type {
        McpServerType::Stdio => match (container, command) {
            (Some(image), _) => server.run_container(image, args),
            (None, Some(command)) => {
                server.command = Some(command.to_string());
                server.args = args;
            }
            (None, None) => return Err(missing(name, "command")),
        },
        McpServerType::Docker => {
            let image = container.ok_or_else(|| missing(name, "container"))?;
            server.run_container(image, args);
        }
        McpServerType::Http => {
            let url = section.get("url").and_then(Value::as_str).ok_or_else(|| missing(name, "url"))?;
            server.url = Some(url.to_string());
        }
    }

    let mut allowed = string_list(config.get("allowed"));
    if nested {
        allowed.extend(string_list(section.get("allowed")));
    }
    server.allowed = allowed.into_iter().collect::<IndexSet<_>>().into_iter().collect();
    Ok(Some(server))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(k, v)| {
                    let text = v.as_str().map_or_else(|| v.to_string(), str::to_string);
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn missing(server: &str, field: &'static str) -> McpError {
    McpError::MissingField {
        server: server.to_string(),
        field,
    }
}

fn invalid(server: &str, reason: &str) -> McpError {
    McpError::InvalidSection {
        server: server.to_string(),
        reason: reason.to_string(),
    }
}
