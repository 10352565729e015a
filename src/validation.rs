//! Input checks that run before anything reaches the database.

use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const MAX_URI_LEN: usize = 2048;

static MONGO_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mongodb(\+srv)?://.+$").expect("static regex"));

static OBJECT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{24}$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("MongoDB URI is required")]
    MissingUri,
    #[error("Invalid MongoDB URI format. Must start with mongodb:// or mongodb+srv://")]
    InvalidUri,
    #[error("Invalid dashboard ID format")]
    InvalidId,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be a non-empty string")]
    EmptyField(&'static str),
    #[error("{0} must be a string")]
    NotAString(&'static str),
    #[error("port must be a valid port number (1-65535)")]
    InvalidPort,
}

pub fn connection_uri(uri: Option<&str>) -> Result<&str, ValidationError> {
    let uri = match uri {
        Some(u) if !u.is_empty() => u,
        _ => return Err(ValidationError::MissingUri),
    };
    if uri.chars().count() > MAX_URI_LEN || !MONGO_URI.is_match(uri) {
        return Err(ValidationError::InvalidUri);
    }
    Ok(uri)
}

pub fn dashboard_id(id: &str) -> Result<ObjectId, ValidationError> {
    if !OBJECT_ID.is_match(id) {
        return Err(ValidationError::InvalidId);
    }
    ObjectId::parse_str(id).map_err(|_| ValidationError::InvalidId)
}

/// Port as the form sends it: a JSON integer or the raw text field.
pub fn parse_port(value: &Value) -> Result<u16, ValidationError> {
    let value = match value {
        Value::Number(n) => n.as_i64().ok_or(ValidationError::InvalidPort)?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidPort)?,
        _ => return Err(ValidationError::InvalidPort),
    };
    match u16::try_from(value) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(ValidationError::InvalidPort),
    }
}

/// Fields written by an update, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPatch {
    pub guild_id: String,
    pub url: String,
    pub port: u16,
}

/// Checks guildID, url, then port and reports the first violation.
pub fn dashboard_patch(
    guild_id: Option<&Value>,
    url: Option<&Value>,
    port_value: Option<&Value>,
) -> Result<DashboardPatch, ValidationError> {
    let guild_id = required_text("guildID", guild_id)?;
    let url = required_text("url", url)?;
    let port = match port_value {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("port")),
        Some(v) => parse_port(v)?,
    };
    Ok(DashboardPatch {
        guild_id: guild_id.to_owned(),
        url: url.to_owned(),
        port,
    })
}

fn required_text<'a>(
    field: &'static str,
    value: Option<&'a Value>,
) -> Result<&'a str, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(v)) if v.trim().is_empty() => Err(ValidationError::EmptyField(field)),
        Some(Value::String(v)) => Ok(v),
        Some(_) => Err(ValidationError::NotAString(field)),
    }
}
