//! Service layer containing business logic orchestration.

mod adapter;
pub mod dispatcher;
mod frame_service;

pub use adapter::OutputAdapter;
pub use dispatcher::{CommandDecoder, CommandListener, DatagramReport, DecodeOutcome, FrameEntry};
pub use frame_service::{load_dictionary, parse_hex, FrameService, EXIT_BLOCKED, EXIT_ERROR, EXIT_OK};
