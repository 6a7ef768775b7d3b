// Wire protocol for the discovery service: command frames and lobby DTOs.
// One TCP read is one frame; payload shapes are validated here during decode
// so the connection handlers only ever dispatch on typed variants.

use crate::domain::LobbyInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Fixed response for a successful `GetStatus`.
pub const STATUS_OK_RESPONSE: &str = "ok";

/// Fixed response for frames a client connection cannot service.
pub const UNKNOWN_COMMAND_RESPONSE: &str = "unknown-command";

/// Marker sent in place of a snapshot when a `GetLobbyInfo` identifier does
/// not parse. Valid JSON, but never decodable as a `LobbyInfoDto`.
pub const CORRUPTED_GUID_MARKER: &str = "corrupted-guid";

/// Immutable snapshot of a lobby record as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyInfoDto {
    pub name: String,
    pub current_players: u32,
    pub max_players: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub status: String,
}

impl From<LobbyInfo> for LobbyInfoDto {
    fn from(info: LobbyInfo) -> Self {
        Self {
            name: info.name,
            current_players: info.current_players,
            max_players: info.max_players,
            port: info.port,
            status: info.status,
        }
    }
}

impl From<LobbyInfoDto> for LobbyInfo {
    fn from(dto: LobbyInfoDto) -> Self {
        Self {
            name: dto.name,
            current_players: dto.current_players,
            max_players: dto.max_players,
            port: dto.port,
            status: dto.status,
        }
    }
}

/// Identifier token carried by `GetLobbyInfo`. Tokens that fail to parse are
/// preserved verbatim so the responder can answer per item instead of
/// rejecting the whole frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyKey {
    Valid(Uuid),
    Malformed(String),
}

/// `GetLobbyInfo` accepts a single identifier or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyQuery {
    One(LobbyKey),
    Many(Vec<LobbyKey>),
}

/// `PostLobbyInfo` content after schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyPayload {
    Valid(LobbyInfoDto),
    /// Content that did not match the lobby schema. Hosts sending this are
    /// treated as broken peers and dropped.
    Invalid,
}

/// A decoded protocol frame. Syntactically invalid input and unrecognized
/// type tags never construct a `Command`; `decode` returns `None` for those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Close,
    GetStatus,
    GetLobbyGuids,
    GetLobbyInfo(LobbyQuery),
    PostLobbyInfo(LobbyPayload),
}

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
}

/// Serializes a command to its wire form. Lossless for every constructible
/// command: `decode(&encode(&c)) == Some(c)`.
pub fn encode(command: &Command) -> String {
    let (kind, content) = match command {
        Command::Close => ("Close", Value::Null),
        Command::GetStatus => ("GetStatus", Value::Null),
        Command::GetLobbyGuids => ("GetLobbyGuids", Value::Null),
        Command::GetLobbyInfo(query) => ("GetLobbyInfo", query_value(query)),
        Command::PostLobbyInfo(payload) => ("PostLobbyInfo", payload_value(payload)),
    };

    let mut frame = serde_json::Map::new();
    frame.insert("type".to_string(), Value::String(kind.to_string()));
    if !content.is_null() {
        frame.insert("content".to_string(), content);
    }
    Value::Object(frame).to_string()
}

/// Parses one frame. `None` means "unknown command" and is a normal,
/// expected outcome for malformed input.
pub fn decode(text: &str) -> Option<Command> {
    let frame: Frame = serde_json::from_str(text.trim()).ok()?;
    match frame.kind.as_str() {
        "Close" => Some(Command::Close),
        "GetStatus" => Some(Command::GetStatus),
        "GetLobbyGuids" => Some(Command::GetLobbyGuids),
        "GetLobbyInfo" => Some(Command::GetLobbyInfo(decode_query(frame.content))),
        "PostLobbyInfo" => Some(Command::PostLobbyInfo(decode_payload(frame.content))),
        _ => None,
    }
}

fn query_value(query: &LobbyQuery) -> Value {
    match query {
        LobbyQuery::One(key) => key_value(key),
        LobbyQuery::Many(keys) => Value::Array(keys.iter().map(key_value).collect()),
    }
}

fn key_value(key: &LobbyKey) -> Value {
    match key {
        LobbyKey::Valid(guid) => Value::String(guid.to_string()),
        LobbyKey::Malformed(raw) => Value::String(raw.clone()),
    }
}

fn payload_value(payload: &LobbyPayload) -> Value {
    match payload {
        LobbyPayload::Valid(dto) => serde_json::to_value(dto).unwrap_or(Value::Null),
        LobbyPayload::Invalid => Value::Null,
    }
}

fn decode_query(content: Value) -> LobbyQuery {
    match content {
        Value::Array(items) => LobbyQuery::Many(items.into_iter().map(decode_key).collect()),
        other => LobbyQuery::One(decode_key(other)),
    }
}

fn decode_key(item: Value) -> LobbyKey {
    let raw = match item {
        Value::String(raw) => raw,
        other => other.to_string(),
    };
    match Uuid::parse_str(&raw) {
        Ok(guid) => LobbyKey::Valid(guid),
        Err(_) => LobbyKey::Malformed(raw),
    }
}

fn decode_payload(content: Value) -> LobbyPayload {
    match serde_json::from_value::<LobbyInfoDto>(content) {
        Ok(dto) => LobbyPayload::Valid(dto),
        Err(_) => LobbyPayload::Invalid,
    }
}
