//! # napchain
//!
//! Message segment model and chain algebra for OneBot v11 / NapCat bots.
//!
//! ## Overview
//!
//! This crate is the composition layer a bot client uses to build,
//! concatenate, serialize and preview chat messages:
//!
//! - [`Segment`]: one typed unit of content (text, mention, image, face,
//!   voice, video, poke, dice, rock-paper-scissors, reply, music card,
//!   raw JSON payload), with a single canonical wire form.
//! - [`MessageChain`]: an ordered sequence of segments forming one
//!   complete message, with an append-only concatenation algebra.
//! - [`IncomingMessage`] and friends: serde models for the message events
//!   a gateway delivers.
//!
//! Everything here is a pure value: no I/O, no shared mutable state.
//! Concatenation always yields a fresh chain, so chains are safe to share
//! across tasks and hand to a transport as read-only snapshots.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use napchain::{MessageChain, Segment};
//!
//! // Build an outgoing message.
//! let chain = MessageChain::new()
//!     .reply(42)
//!     .at(10001000)
//!     .text(" 你好")
//!     .face(178);
//!
//! // Wire form for the gateway.
//! let wire = chain.serialize();
//!
//! // Lossy preview for logs.
//! tracing::info!("sending: {}", chain.display());
//!
//! // Reconstruct a chain from a received payload or a plain string.
//! let echoed = MessageChain::parse(&wire);
//! assert_eq!(echoed, chain);
//! ```
//!
//! ## Wire Format
//!
//! A chain serializes to a JSON array of segment objects, each
//! `{"type": <tag>, "data": {...}}` (data-less kinds such as dice and
//! rock-paper-scissors omit `data`). Parsing accepts either that array
//! form or a plain string, which wraps as a single text segment. Array
//! elements of kinds outside the modeled set are preserved verbatim as
//! [`Segment::Unknown`] and skipped in previews.

pub mod chain;
pub mod error;
pub mod event;
pub mod segment;

pub use chain::MessageChain;
pub use error::EventError;
pub use event::{GroupMessageEvent, IncomingMessage, MessageEvent, PrivateMessageEvent, Sender};
pub use segment::{
    AtData, AtTarget, FaceData, ImageData, JsonData, MusicData, PokeData, PokeMethod, RecordData,
    ReplyData, Segment, TextData, VideoData,
};
