use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::attachment::Field;
use crate::error::{Error, Result};
use crate::slack::SlackClient;

pub const DEFAULT_SEPARATOR: &str = "==";
const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Variables the CI host must provide, checked in this order.
pub const REQUIRED_CONTEXT: [&str; 4] = [
    "GITHUB_ACTOR",
    "GITHUB_REPOSITORY",
    "STATUS",
    "GITHUB_WORKFLOW",
];

/// Snapshot of the process environment taken once at startup.
///
/// Unset and empty variables are treated the same.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Workflow run the notification is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub actor: String,
    pub repository: String,
    pub workflow: String,
    pub run_id: String,
    pub server_url: String,
}

impl RunContext {
    /// Fails with the first missing CI variable, by name.
    pub fn from_env(env: &Environment) -> Result<Self> {
        if let Some(missing) = REQUIRED_CONTEXT.iter().find(|v| env.get(v).is_none()) {
            return Err(Error::MissingEnv(*missing));
        }

        Ok(Self {
            actor: env.get_or_empty("GITHUB_ACTOR").to_string(),
            repository: env.get_or_empty("GITHUB_REPOSITORY").to_string(),
            workflow: env.get_or_empty("GITHUB_WORKFLOW").to_string(),
            run_id: env.get_or_empty("GITHUB_RUN_ID").to_string(),
            server_url: env
                .get("GITHUB_SERVER_URL")
                .unwrap_or(DEFAULT_SERVER_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Validated settings for one invocation.
pub struct Config {
    pub channel: String,
    pub attachments_file: Option<PathBuf>,
    pub timestamp_file: Option<PathBuf>,
    /// Message to update; empty means post a new one.
    pub timestamp: String,
    pub status: String,
    pub fail: bool,
    pub fields: Vec<Field>,
    pub client: SlackClient,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel", &self.channel)
            .field("attachments_file", &self.attachments_file)
            .field("timestamp_file", &self.timestamp_file)
            .field("timestamp", &self.timestamp)
            .field("status", &self.status)
            .field("fail", &self.fail)
            .field("fields", &self.fields)
            .field("client", &self.client)
            .finish()
    }
}

impl Config {
    pub fn resolve(env: &Environment, args: &[String]) -> Result<Self> {
        let separator = env.get("SEPARATOR").unwrap_or(DEFAULT_SEPARATOR);
        let fields = parse_fields(args, separator);

        let timestamp_file = env.get("TIMESTAMP_FILE").map(PathBuf::from);
        let timestamp = match &timestamp_file {
            Some(path) => read_timestamp(path)?,
            None => env.get_or_empty("TIMESTAMP").to_string(),
        };

        let channel = env.get("CHANNEL").ok_or(Error::MissingChannel)?;
        let attachments_file = env.get("ATTACHMENTS_FILE").map(PathBuf::from);
        let token = env.get("TOKEN").ok_or(Error::MissingToken)?;

        let fail = match env.get("FAIL") {
            Some(raw) => parse_bool(raw).ok_or_else(|| Error::InvalidFail(raw.to_string()))?,
            None => false,
        };

        let client = SlackClient::new(token, env.get("SLACK_API_URL")).map_err(Error::Client)?;

        let config = Self {
            channel: channel.to_string(),
            attachments_file,
            timestamp_file,
            timestamp,
            status: env.get_or_empty("STATUS").to_string(),
            fail,
            fields,
            client,
        };
        tracing::debug!(?config, "Resolved configuration");
        Ok(config)
    }
}

/// Turn `title<sep>value` lines into short fields.
///
/// Lines that do not split into exactly two parts are skipped.
pub fn parse_fields(args: &[String], separator: &str) -> Vec<Field> {
    let mut fields = Vec::new();
    for line in args.iter().flat_map(|arg| arg.lines()) {
        let parts: Vec<&str> = line.split(separator).collect();
        match parts.as_slice() {
            [title, value] => fields.push(Field::short(title.trim(), value.trim())),
            _ => tracing::debug!(line, "Skipping malformed field line"),
        }
    }
    fields
}

/// Missing file means no previous message.
fn read_timestamp(path: &Path) -> Result<String> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| Error::TimestampDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(Error::ReadTimestamp {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
