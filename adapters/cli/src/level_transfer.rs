#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gridlock_core::{Direction, GridPos, Level, LevelError, StartBlock};
use serde::{Deserialize, Serialize};

const TRANSFER_DOMAIN: &str = "grid";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
const TRANSFER_HEADER: &str = "grid:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Level fields carried inside the encoded payload; dimensions travel in the
/// readable part of the code instead.
#[derive(Serialize, Deserialize)]
struct SerializableLevel {
    start_blocks: Vec<StartBlock>,
    win_pattern: Vec<GridPos>,
    solution: Vec<Direction>,
}

/// Encodes the level into a single-line string suitable for clipboard
/// transfer.
#[must_use]
pub(crate) fn encode(level: &Level) -> String {
    let payload = SerializableLevel {
        start_blocks: level.start_blocks().to_vec(),
        win_pattern: level.win_pattern().to_vec(),
        solution: level.solution().to_vec(),
    };
    let json = serde_json::to_vec(&payload).expect("level payload serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        level.width(),
        level.height()
    )
}

/// Decodes a level from its string representation, re-running the full level
/// validation so tampered codes cannot smuggle in an ill-formed definition.
pub(crate) fn decode(value: &str) -> Result<Level, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let decoded: SerializableLevel =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    Level::new(
        width,
        height,
        decoded.start_blocks,
        decoded.win_pattern,
        decoded.solution,
    )
    .map_err(LevelTransferError::InvalidLevel)
}

fn parse_dimensions(value: &str) -> Result<(i32, i32), LevelTransferError> {
    let mut parts = value.split('x');
    let width = parts.next().and_then(|part| part.parse().ok());
    let height = parts.next().and_then(|part| part.parse().ok());
    match (width, height, parts.next()) {
        (Some(width), Some(height), None) => Ok((width, height)),
        _ => Err(LevelTransferError::InvalidDimensions(value.to_owned())),
    }
}

/// Failures raised while decoding a level transfer code.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty after trimming.
    EmptyPayload,
    /// No domain prefix was present.
    MissingPrefix,
    /// No version segment was present.
    MissingVersion,
    /// No dimension segment was present.
    MissingDimensions,
    /// No payload segment was present.
    MissingPayload,
    /// The domain prefix did not match this application.
    InvalidPrefix(String),
    /// The version segment named an unsupported format revision.
    UnsupportedVersion(String),
    /// The dimension segment was not of the form `WxH`.
    InvalidDimensions(String),
    /// The payload was not valid base64.
    InvalidEncoding(base64::DecodeError),
    /// The payload did not deserialize into level fields.
    InvalidPayload(serde_json::Error),
    /// The decoded fields failed level validation.
    InvalidLevel(LevelError),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer code is empty"),
            Self::MissingPrefix => write!(f, "transfer code is missing its prefix"),
            Self::MissingVersion => write!(f, "transfer code is missing its version"),
            Self::MissingDimensions => write!(f, "transfer code is missing its dimensions"),
            Self::MissingPayload => write!(f, "transfer code is missing its payload"),
            Self::InvalidPrefix(prefix) => write!(f, "unrecognised transfer prefix `{prefix}`"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported transfer version `{version}`")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "invalid board dimensions `{dimensions}`")
            }
            Self::InvalidEncoding(source) => write!(f, "payload is not valid base64: {source}"),
            Self::InvalidPayload(source) => write!(f, "payload did not deserialize: {source}"),
            Self::InvalidLevel(source) => write!(f, "decoded level is invalid: {source}"),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(source) => Some(source),
            Self::InvalidPayload(source) => Some(source),
            Self::InvalidLevel(source) => Some(source),
            _ => None,
        }
    }
}
