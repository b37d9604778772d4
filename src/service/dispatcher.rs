//! Decoding received buffers and dispatching them to listeners.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::domain::codec::{peek_path, Codec};
use crate::domain::error::{DecodeError, DictionaryError, NetworkFrameError};
use crate::domain::filters::{CommandFilter, FilterStatus};
use crate::domain::network::{BufferKind, FrameType, NetworkFrames};
use crate::domain::types::{CommandFrame, CommandPath};

/// Receives decoded frames of the paths it is registered for.
pub trait CommandListener: Send + Sync {
    fn on_command(&self, frame: &CommandFrame<'_>);
}

impl<F> CommandListener for F
where
    F: Fn(&CommandFrame<'_>) + Send + Sync,
{
    fn on_command(&self, frame: &CommandFrame<'_>) {
        self(frame)
    }
}

/// What happened to one decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodeOutcome {
    /// A listener received the frame
    Dispatched,
    /// Known command without listener, dropped
    NoCallback,
    /// Path not in the dictionary, absorbed
    Unknown,
    /// Rejected by the filter
    Blocked,
}

impl fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecodeOutcome::Dispatched => "DISPATCHED",
            DecodeOutcome::NoCallback => "NO_CALLBACK",
            DecodeOutcome::Unknown => "UNKNOWN",
            DecodeOutcome::Blocked => "BLOCKED",
        })
    }
}

/// One transport frame of a datagram, as handled by [`CommandDecoder::decode_datagram`].
#[derive(Debug, Clone, Serialize)]
pub struct FrameEntry {
    pub frame_type: FrameType,
    pub buffer_id: u8,
    pub seq: u8,
    pub kind: BufferKind,
    pub payload_len: usize,
    /// Header of the command buffer, when it could be read
    pub path: Option<CommandPath>,
    pub outcome: Option<DecodeOutcome>,
    pub error: Option<String>,
}

/// Summary of a decoded datagram.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatagramReport {
    pub frames: Vec<FrameEntry>,
    pub dispatched: usize,
    pub no_callback: usize,
    pub unknown: usize,
    pub blocked: usize,
    /// Command buffers that failed to decode
    pub dropped: usize,
    /// Framing error that ended the datagram early
    #[serde(serialize_with = "serialize_framing_error")]
    pub framing_error: Option<NetworkFrameError>,
}

fn serialize_framing_error<S>(error: &Option<NetworkFrameError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.collect_str(e),
        None => serializer.serialize_none(),
    }
}

impl DatagramReport {
    fn count(&mut self, outcome: DecodeOutcome) {
        match outcome {
            DecodeOutcome::Dispatched => self.dispatched += 1,
            DecodeOutcome::NoCallback => self.no_callback += 1,
            DecodeOutcome::Unknown => self.unknown += 1,
            DecodeOutcome::Blocked => self.blocked += 1,
        }
    }
}

/// Decodes command buffers, applies the filter and calls listeners.
///
/// Registering listeners needs `&mut self`; decoding only needs `&self`.
pub struct CommandDecoder {
    codec: Codec,
    filter: Option<CommandFilter>,
    listeners: HashMap<CommandPath, Box<dyn CommandListener>>,
}

impl CommandDecoder {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            filter: None,
            listeners: HashMap::new(),
        }
    }

    pub fn with_filter(mut self, filter: CommandFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn filter(&self) -> Option<&CommandFilter> {
        self.filter.as_ref()
    }

    /// Install or replace the filter, returning the previous one.
    pub fn set_filter(&mut self, filter: Option<CommandFilter>) -> Option<CommandFilter> {
        std::mem::replace(&mut self.filter, filter)
    }

    /// Register the listener of `path`, returning the one it replaces.
    pub fn register(
        &mut self,
        path: CommandPath,
        listener: impl CommandListener + 'static,
    ) -> Option<Box<dyn CommandListener>> {
        self.listeners.insert(path, Box::new(listener))
    }

    /// Register a listener by `project.Class.Command` name.
    pub fn register_by_name(
        &mut self,
        name: &str,
        listener: impl CommandListener + 'static,
    ) -> Result<CommandPath, DictionaryError> {
        let path = self.codec.dictionary().resolve_path(name)?;
        self.register(path, listener);
        Ok(path)
    }

    pub fn unregister(&mut self, path: CommandPath) -> Option<Box<dyn CommandListener>> {
        self.listeners.remove(&path)
    }

    /// Filter status of `path`; `Allowed` without a filter.
    pub fn status(&self, path: CommandPath) -> FilterStatus {
        self.filter
            .as_ref()
            .map_or(FilterStatus::Allowed, |filter| filter.evaluate(path))
    }

    /// Decode one command buffer and hand it to its listener.
    ///
    /// The filter is consulted on the header before the arguments are
    /// parsed. An unusable filter blocks everything.
    pub fn decode_buffer(&self, bytes: &[u8]) -> Result<DecodeOutcome, DecodeError> {
        self.decode_frame(bytes).map(|(outcome, _)| outcome)
    }

    /// Same as [`decode_buffer`](Self::decode_buffer), also returning the
    /// parsed frame. Blocked buffers are never parsed and give `None`.
    pub fn decode_frame<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<(DecodeOutcome, Option<CommandFrame<'a>>), DecodeError> {
        let path = peek_path(bytes)?;
        match self.status(path) {
            FilterStatus::Allowed => {}
            FilterStatus::Blocked => {
                debug!("Command {} blocked by filter", path);
                return Ok((DecodeOutcome::Blocked, None));
            }
            status @ (FilterStatus::Unknown | FilterStatus::Error) => {
                warn!("Filter returned {} for {}, blocking", status, path);
                return Ok((DecodeOutcome::Blocked, None));
            }
        }

        let frame = self.codec.decode(bytes)?;
        if frame.is_unknown() {
            debug!("Unknown command {} ({} bytes)", path, bytes.len());
            return Ok((DecodeOutcome::Unknown, Some(frame)));
        }

        let outcome = match self.listeners.get(&path) {
            Some(listener) => {
                trace!("Dispatching {}", path);
                listener.on_command(&frame);
                DecodeOutcome::Dispatched
            }
            None => {
                trace!("No listener for {}", path);
                DecodeOutcome::NoCallback
            }
        };
        Ok((outcome, Some(frame)))
    }

    /// Decode every command buffer of a datagram.
    ///
    /// A command buffer that fails to decode is dropped and decoding goes
    /// on with the next frame. A framing error ends the datagram.
    pub fn decode_datagram(&self, datagram: &[u8]) -> DatagramReport {
        let mut report = DatagramReport::default();
        for item in NetworkFrames::new(datagram) {
            let frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Dropping rest of datagram: {}", e);
                    report.framing_error = Some(e);
                    break;
                }
            };

            let mut entry = FrameEntry {
                frame_type: frame.frame_type,
                buffer_id: frame.buffer_id,
                seq: frame.seq,
                kind: frame.kind(),
                payload_len: frame.payload.len(),
                path: None,
                outcome: None,
                error: None,
            };
            let is_command = entry.kind == BufferKind::Command && frame.frame_type != FrameType::Ack;
            if is_command {
                entry.path = peek_path(frame.payload).ok();
                match self.decode_buffer(frame.payload) {
                    Ok(outcome) => {
                        report.count(outcome);
                        entry.outcome = Some(outcome);
                    }
                    Err(e) => {
                        warn!(
                            "Dropping command buffer {} seq {}: {}",
                            frame.buffer_id, frame.seq, e
                        );
                        report.dropped += 1;
                        entry.error = Some(e.to_string());
                    }
                }
            }
            report.frames.push(entry);
        }
        report
    }
}
