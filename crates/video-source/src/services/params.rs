//! Stream parameter resolution.
//!
//! Turns the request's query pairs into a [`StreamConfig`]. Each recognized
//! key is described by one entry in [`PARAMETERS`]; resolution walks the
//! pairs once, consults only the first occurrence of every key and stops at
//! the first invalid value. Unknown keys are ignored.

use crate::models::StreamConfig;
use std::num::ParseIntError;
use thiserror::Error;

/// Rejection produced while resolving stream parameters.
///
/// Messages name the offending key and the raw value so they can be returned
/// to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("failed to parse {name} {value:?}: {reason}")]
    Unparseable {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid {name} {value:?}: must be greater than 0")]
    NotPositive { name: &'static str, value: String },

    #[error("invalid {name} {value:?}: must not exceed {max}")]
    OutOfRange {
        name: &'static str,
        value: String,
        max: u64,
    },

    #[error("frame size of {frame_size} bytes exceeds the limit of {limit} bytes")]
    FrameTooLarge { frame_size: u64, limit: u64 },
}

impl ParameterError {
    /// The parameter that caused the rejection (bounded metric label).
    pub fn parameter(&self) -> &'static str {
        match self {
            ParameterError::Unparseable { name, .. }
            | ParameterError::NotPositive { name, .. }
            | ParameterError::OutOfRange { name, .. } => *name,
            ParameterError::FrameTooLarge { .. } => "frame_size",
        }
    }
}

/// One recognized query parameter.
struct Parameter {
    name: &'static str,
    apply: fn(&mut StreamConfig, &'static str, &str) -> Result<(), ParameterError>,
}

/// Recognized query parameters.
const PARAMETERS: &[Parameter] = &[
    Parameter {
        name: "seed",
        apply: apply_seed,
    },
    Parameter {
        name: "duration",
        apply: apply_duration,
    },
    Parameter {
        name: "fps",
        apply: apply_fps,
    },
    Parameter {
        name: "bitrate",
        apply: apply_bitrate,
    },
];

fn apply_seed(
    config: &mut StreamConfig,
    name: &'static str,
    raw: &str,
) -> Result<(), ParameterError> {
    config.seed = parse_integer(name, raw)?;
    Ok(())
}

fn apply_duration(
    config: &mut StreamConfig,
    name: &'static str,
    raw: &str,
) -> Result<(), ParameterError> {
    config.duration_ms = parse_positive(name, raw)?;
    Ok(())
}

fn apply_fps(
    config: &mut StreamConfig,
    name: &'static str,
    raw: &str,
) -> Result<(), ParameterError> {
    let fps = parse_positive(name, raw)?;
    config.fps = u32::try_from(fps).map_err(|_| ParameterError::OutOfRange {
        name,
        value: raw.to_string(),
        max: u64::from(u32::MAX),
    })?;
    Ok(())
}

fn apply_bitrate(
    config: &mut StreamConfig,
    name: &'static str,
    raw: &str,
) -> Result<(), ParameterError> {
    config.bitrate = parse_positive(name, raw)?;
    Ok(())
}

fn parse_integer(name: &'static str, raw: &str) -> Result<i64, ParameterError> {
    raw.parse()
        .map_err(|e: ParseIntError| ParameterError::Unparseable {
            name,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a signed integer and require it to be strictly positive.
///
/// Parsing as signed first lets "-5" report as non-positive rather than
/// unparseable.
fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ParameterError> {
    let value = parse_integer(name, raw)?;

    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ParameterError::NotPositive {
            name,
            value: raw.to_string(),
        })
}

/// Resolves query pairs into a [`StreamConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver {
    max_frame_bytes: u64,
}

impl ParameterResolver {
    /// Create a resolver that rejects configurations whose frames exceed
    /// `max_frame_bytes`.
    pub fn new(max_frame_bytes: u64) -> Self {
        Self { max_frame_bytes }
    }

    /// Resolve the given pairs, falling back to defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] encountered. No partial
    /// configuration is produced.
    pub fn resolve<'a, I>(&self, pairs: I) -> Result<StreamConfig, ParameterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = StreamConfig::default();
        let mut seen = [false; PARAMETERS.len()];

        for (key, value) in pairs {
            let Some((parameter, already_seen)) = PARAMETERS
                .iter()
                .zip(seen.iter_mut())
                .find(|(parameter, _)| parameter.name == key)
            else {
                continue;
            };

            if *already_seen {
                continue;
            }
            *already_seen = true;

            (parameter.apply)(&mut config, parameter.name, value)?;
        }

        let frame_size = config.geometry().frame_size;
        if frame_size > self.max_frame_bytes {
            return Err(ParameterError::FrameTooLarge {
                frame_size,
                limit: self.max_frame_bytes,
            });
        }

        Ok(config)
    }
}
