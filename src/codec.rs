//! Transport encodings for level maps.
//!
//! JSON is `{"l": {name: level}}` with the field left out when the map is
//! empty. Explicit UNSET entries are always written: a diff that resets a
//! logger to UNSET has to survive the trip.
//!
//! Binary uses bincode over the bare name-to-level map (bincode cannot skip
//! fields, so it does not share the JSON shape).

use crate::domain::{Level, LevelMap, LevelMapError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary encoding failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Binary decoding failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Invalid level map: {0}")]
    InvalidMap(#[from] LevelMapError),
    #[error("{0} trailing bytes after level map")]
    TrailingBytes(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Json,
    Binary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LevelMapCodec {
    format: WireFormat,
}

impl LevelMapCodec {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn encode(&self, levels: &LevelMap) -> Result<Vec<u8>, CodecError> {
        match self.format {
            WireFormat::Json => Ok(serde_json::to_vec(levels)?),
            WireFormat::Binary => Ok(bincode::serde::encode_to_vec(
                levels.levels(),
                bincode::config::standard(),
            )?),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<LevelMap, CodecError> {
        match self.format {
            WireFormat::Json => Ok(serde_json::from_slice(bytes)?),
            WireFormat::Binary => {
                let (levels, read): (BTreeMap<String, Level>, usize) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
                if read != bytes.len() {
                    return Err(CodecError::TrailingBytes(bytes.len() - read));
                }
                Ok(LevelMap::try_from(levels)?)
            }
        }
    }
}
