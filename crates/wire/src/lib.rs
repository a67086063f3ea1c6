// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wire-level concerns shared by the engine and the supervisor: the
//! [`MessageTransport`] capability, mention parsing, and length-prefixed
//! JSON framing for process-boundary IPC.

pub mod framing;
pub mod mention;
pub mod transport;

pub use framing::{decode, encode, read_envelope, read_message, write_envelope, write_message, ProtocolError};
pub use mention::{parse, CanonicalMention};
pub use transport::{Ack, CheckMode, CheckOptions, MessageTransport, Payload, PingResult, RawEvent, TransportError};
