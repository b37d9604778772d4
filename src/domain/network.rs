//! Transport frames carrying command buffers.
//!
//! A datagram holds one or more frames laid out as
//! `[type:u8][buffer id:u8][seq:u8][size:u32 LE][payload]`, where `size`
//! counts the 7-byte header too.

use std::fmt;

use serde::Serialize;

use super::error::NetworkFrameError;

/// Size of the frame header.
pub const NETWORK_HEADER_LEN: usize = 7;

/// Buffer ids carrying command buffers.
pub const COMMAND_BUFFER_IDS: [u8; 6] = [10, 11, 12, 126, 127, 42];

/// Buffer ids carrying video/audio stream data.
pub const STREAM_BUFFER_IDS: [u8; 6] = [13, 14, 15, 123, 124, 125];

/// First buffer id used for acknowledgements.
pub const ACK_BUFFER_ID_OFFSET: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum FrameType {
    Uninitialized = 0,
    Ack = 1,
    Data = 2,
    DataLowLatency = 3,
    DataWithAck = 4,
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => FrameType::Uninitialized,
            1 => FrameType::Ack,
            2 => FrameType::Data,
            3 => FrameType::DataLowLatency,
            4 => FrameType::DataWithAck,
            other => return Err(other),
        })
    }
}

/// What a buffer id is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferKind {
    Ping,
    Pong,
    Command,
    Stream,
    Ack,
    Other,
}

impl BufferKind {
    pub fn of(buffer_id: u8) -> Self {
        match buffer_id {
            0 => BufferKind::Ping,
            1 => BufferKind::Pong,
            id if id >= ACK_BUFFER_ID_OFFSET => BufferKind::Ack,
            id if COMMAND_BUFFER_IDS.contains(&id) => BufferKind::Command,
            id if STREAM_BUFFER_IDS.contains(&id) => BufferKind::Stream,
            _ => BufferKind::Other,
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferKind::Ping => "ping",
            BufferKind::Pong => "pong",
            BufferKind::Command => "command",
            BufferKind::Stream => "stream",
            BufferKind::Ack => "ack",
            BufferKind::Other => "other",
        })
    }
}

/// One frame of a datagram. The payload borrows from the datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkFrame<'a> {
    pub frame_type: FrameType,
    pub buffer_id: u8,
    pub seq: u8,
    pub payload: &'a [u8],
}

impl NetworkFrame<'_> {
    pub fn kind(&self) -> BufferKind {
        BufferKind::of(self.buffer_id)
    }

    /// Whether the sender waits for an acknowledgement.
    pub fn needs_ack(&self) -> bool {
        self.frame_type == FrameType::DataWithAck
    }

    /// Buffer id on which the acknowledgement of this frame travels.
    pub fn ack_buffer_id(&self) -> u8 {
        self.buffer_id.wrapping_add(ACK_BUFFER_ID_OFFSET)
    }
}

/// Iterator over the frames of a datagram.
///
/// Stops after yielding a single error for an invalid header.
pub struct NetworkFrames<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> NetworkFrames<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    fn fail(&mut self, error: NetworkFrameError) -> Option<Result<NetworkFrame<'a>, NetworkFrameError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl<'a> Iterator for NetworkFrames<'a> {
    type Item = Result<NetworkFrame<'a>, NetworkFrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset;
        let rest = &self.bytes[offset..];
        if self.failed || rest.is_empty() {
            return None;
        }
        let Some(header) = rest.get(..NETWORK_HEADER_LEN) else {
            return self.fail(NetworkFrameError::TruncatedHeader {
                offset,
                available: rest.len(),
            });
        };

        let frame_type = match FrameType::try_from(header[0]) {
            Ok(frame_type) => frame_type,
            Err(frame_type) => {
                return self.fail(NetworkFrameError::InvalidType { offset, frame_type })
            }
        };
        let size = u32::from_le_bytes([header[3], header[4], header[5], header[6]]);
        let len = size as usize;
        if len < NETWORK_HEADER_LEN || len > rest.len() {
            return self.fail(NetworkFrameError::InvalidSize { offset, size });
        }

        self.offset += len;
        Some(Ok(NetworkFrame {
            frame_type,
            buffer_id: header[1],
            seq: header[2],
            payload: &rest[NETWORK_HEADER_LEN..len],
        }))
    }
}

/// Build one frame around `payload`.
pub fn encode_network_frame(
    frame_type: FrameType,
    buffer_id: u8,
    seq: u8,
    payload: &[u8],
) -> Result<Vec<u8>, NetworkFrameError> {
    let size = u32::try_from(NETWORK_HEADER_LEN + payload.len()).map_err(|_| {
        NetworkFrameError::InvalidSize {
            offset: 0,
            size: u32::MAX,
        }
    })?;
    let mut out = Vec::with_capacity(NETWORK_HEADER_LEN + payload.len());
    out.push(frame_type as u8);
    out.push(buffer_id);
    out.push(seq);
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}
