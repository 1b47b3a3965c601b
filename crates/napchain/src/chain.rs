//! Message chain: an ordered sequence of segments forming one message.
//!
//! A chain is built directly from segments, by concatenation with `+`, or
//! by parsing a previously serialized chain string. Its only externally
//! visible representation is the JSON array of segment objects; order is
//! display and playback order.
//!
//! # Example
//!
//! ```rust,ignore
//! use napchain::{MessageChain, Segment};
//!
//! let chain = MessageChain::new()
//!     .text("Hello, ")
//!     .at(10001000)
//!     .face(178);
//!
//! assert_eq!(chain.display(), "Hello, @10001000[表情]");
//! let wire = chain.serialize();
//! assert_eq!(MessageChain::parse(&wire), chain);
//! ```

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::segment::{AtTarget, PokeMethod, Segment};

// ============================================================================
// MessageChain
// ============================================================================

/// An ordered sequence of [`Segment`]s representing one complete message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageChain {
    /// The segments that make up this message.
    segments: Vec<Segment>,
}

// ============================================================================
// Construction
// ============================================================================

impl MessageChain {
    /// Creates a new empty chain.
    ///
    /// This is the only way to obtain a genuinely empty chain; parsing an
    /// empty string yields a chain with one empty text segment instead.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a chain from a vector of segments, preserving order.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Creates a chain containing a single plain text segment.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::text(text)],
        }
    }

    /// Parses a raw string into a chain.
    ///
    /// The input may be either a previously serialized chain (a JSON array
    /// of segment objects) or a plain message string. A single parse
    /// attempt decides: a JSON array is used verbatim as the segment
    /// sequence, element-preserving and without re-validation (kinds
    /// outside the modeled set are carried as [`Segment::Unknown`]);
    /// anything else makes the whole original string one text segment.
    /// This path never fails.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<Segment>>(raw) {
            Ok(segments) => Self { segments },
            Err(_) => {
                tracing::trace!(
                    len = raw.len(),
                    "raw chain is not a segment array, wrapping as text"
                );
                Self::from_text(raw)
            }
        }
    }
}

// ============================================================================
// Serialization / Deserialization
// ============================================================================

impl Serialize for MessageChain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The wire form is always the segment array.
        self.segments.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessageChain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Gateways deliver either the array format or a raw string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ChainFormat {
            Array(Vec<Segment>),
            String(String),
        }

        match ChainFormat::deserialize(deserializer)? {
            ChainFormat::Array(segments) => Ok(MessageChain { segments }),
            ChainFormat::String(raw) => Ok(MessageChain::parse(&raw)),
        }
    }
}

impl fmt::Display for MessageChain {
    /// Writes the serialized JSON array form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.segments).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl MessageChain {
    /// Serializes the chain to its wire form: a compact JSON array of
    /// segment objects, in insertion order, with non-ASCII content left
    /// unescaped.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Renders a lossy human-readable preview of the chain.
    ///
    /// Each segment maps to its extracted text or a fixed placeholder
    /// (`[图片]`, `[表情]`, ...), concatenated with no separators. Kinds
    /// with no preview text are skipped. Intended for logs, not for
    /// re-display with full fidelity.
    pub fn display(&self) -> String {
        self.segments.iter().map(ToString::to_string).collect()
    }
}

// ============================================================================
// Concatenation
// ============================================================================
//
// `chain + chain` and `chain + segment` always produce a fresh chain and
// never mutate an operand. The empty chain is the identity.

impl Add for MessageChain {
    type Output = MessageChain;

    fn add(mut self, rhs: MessageChain) -> MessageChain {
        self.segments.extend(rhs.segments);
        self
    }
}

impl Add<&MessageChain> for &MessageChain {
    type Output = MessageChain;

    fn add(self, rhs: &MessageChain) -> MessageChain {
        let mut segments = self.segments.clone();
        segments.extend(rhs.segments.iter().cloned());
        MessageChain { segments }
    }
}

impl Add<Segment> for MessageChain {
    type Output = MessageChain;

    fn add(mut self, rhs: Segment) -> MessageChain {
        self.segments.push(rhs);
        self
    }
}

impl Add<Segment> for &MessageChain {
    type Output = MessageChain;

    fn add(self, rhs: Segment) -> MessageChain {
        let mut segments = self.segments.clone();
        segments.push(rhs);
        MessageChain { segments }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl MessageChain {
    /// Adds a text segment.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::text(text));
        self
    }

    /// Adds a face/emoji segment.
    pub fn face(mut self, id: i64) -> Self {
        self.segments.push(Segment::face(id));
        self
    }

    /// Adds an image segment.
    pub fn image(mut self, file: impl Into<String>) -> Self {
        self.segments.push(Segment::image(file));
        self
    }

    /// Adds a voice clip segment.
    pub fn record(mut self, file: impl Into<String>) -> Self {
        self.segments.push(Segment::record(file));
        self
    }

    /// Adds a video segment.
    pub fn video(mut self, file: impl Into<String>) -> Self {
        self.segments.push(Segment::video(file));
        self
    }

    /// Adds an @mention segment.
    pub fn at(mut self, target: impl Into<AtTarget>) -> Self {
        self.segments.push(Segment::at(target));
        self
    }

    /// Adds an @all segment.
    pub fn at_all(mut self) -> Self {
        self.segments.push(Segment::at_all());
        self
    }

    /// Adds a rock-paper-scissors segment.
    pub fn rps(mut self) -> Self {
        self.segments.push(Segment::rps());
        self
    }

    /// Adds a dice segment.
    pub fn dice(mut self) -> Self {
        self.segments.push(Segment::dice());
        self
    }

    /// Adds a poke segment.
    pub fn poke(mut self, method: impl Into<PokeMethod>) -> Self {
        self.segments.push(Segment::poke(method));
        self
    }

    /// Adds a music card segment.
    pub fn music(mut self, music_type: impl Into<String>, id: impl Into<String>) -> Self {
        self.segments.push(Segment::music(music_type, id));
        self
    }

    /// Adds a custom music card segment.
    pub fn custom_music(
        mut self,
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.segments.push(Segment::custom_music(url, audio, title));
        self
    }

    /// Adds a reply segment.
    pub fn reply(mut self, message_id: impl ToString) -> Self {
        self.segments.push(Segment::reply(message_id));
        self
    }

    /// Adds a JSON message segment.
    pub fn json(mut self, data: impl Into<String>) -> Self {
        self.segments.push(Segment::json(data));
        self
    }

    /// Adds a raw segment.
    pub fn push(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Appends multiple segments.
    pub fn extend(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }
}

// ============================================================================
// Inspection
// ============================================================================

impl MessageChain {
    /// Returns the segments as a read-only slice.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Converts the chain into its segment vector.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the chain has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenates the content of all text segments.
    pub fn extract_plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(Segment::as_text)
            .collect()
    }

    /// Returns all individually @mentioned user IDs, excluding @all.
    pub fn mentioned_users(&self) -> Vec<i64> {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::At(data) if !data.qq.is_all() => data.qq.user_id(),
                _ => None,
            })
            .collect()
    }

    /// Whether the chain mentions everyone.
    pub fn mentions_all(&self) -> bool {
        self.segments
            .iter()
            .any(|seg| matches!(seg, Segment::At(data) if data.qq.is_all()))
    }

    /// The replied-to message ID, if the chain carries a reply segment.
    pub fn reply_to(&self) -> Option<&str> {
        self.segments.iter().find_map(|seg| match seg {
            Segment::Reply(data) => Some(data.id.as_str()),
            _ => None,
        })
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<Vec<Segment>> for MessageChain {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl From<Segment> for MessageChain {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<&str> for MessageChain {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for MessageChain {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl FromIterator<Segment> for MessageChain {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageChain {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segments_preserves_order() {
        let segments = vec![Segment::text("A"), Segment::at(1), Segment::text("B")];
        let chain = MessageChain::from_segments(segments.clone());
        assert_eq!(chain.segments(), segments.as_slice());
    }

    #[test]
    fn test_from_segments_is_a_defensive_copy() {
        let mut segments = vec![Segment::text("A")];
        let chain = MessageChain::from_segments(segments.clone());
        segments.push(Segment::text("B"));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.segments()[0], Segment::text("A"));
    }

    #[test]
    fn test_parse_segment_array() {
        let chain = MessageChain::parse(r#"[{"type":"text","data":{"text":"hi"}}]"#);
        assert_eq!(chain.segments(), &[Segment::text("hi")]);
    }

    #[test]
    fn test_parse_plain_string_wraps_as_text() {
        let chain = MessageChain::parse("hello");
        assert_eq!(chain.segments(), &[Segment::text("hello")]);
    }

    #[test]
    fn test_parse_empty_string() {
        // Not valid JSON, so it wraps as a single empty text segment.
        let chain = MessageChain::parse("");
        assert_eq!(chain.segments(), &[Segment::text("")]);
        assert!(!chain.is_empty());
        assert!(MessageChain::new().is_empty());
    }

    #[test]
    fn test_parse_keeps_out_of_model_kinds() {
        let raw = r#"[{"type":"shake"},{"type":"text","data":{"text":"hi"}}]"#;
        let chain = MessageChain::parse(raw);
        assert_eq!(chain.len(), 2);
        assert!(matches!(chain.segments()[0], Segment::Unknown(_)));
        assert_eq!(chain.segments()[1], Segment::text("hi"));
        // Unmodeled kinds stay on the wire but leave no preview text.
        assert_eq!(chain.display(), "hi");
        assert_eq!(chain.serialize(), raw);
    }

    #[test]
    fn test_parse_uses_any_json_array_verbatim() {
        let chain = MessageChain::parse("[1,\"x\"]");
        assert_eq!(chain.len(), 2);
        assert!(chain.segments().iter().all(|seg| matches!(seg, Segment::Unknown(_))));
        assert_eq!(chain.serialize(), "[1,\"x\"]");
        assert_eq!(chain.display(), "");
    }

    #[test]
    fn test_parse_non_array_json_wraps_original_string() {
        let chain = MessageChain::parse(r#"{"type":"text"}"#);
        assert_eq!(chain.segments(), &[Segment::text(r#"{"type":"text"}"#)]);

        let chain = MessageChain::parse("42");
        assert_eq!(chain.segments(), &[Segment::text("42")]);
    }

    #[test]
    fn test_concat_chains() {
        let a = MessageChain::new().text("A").at(1);
        let b = MessageChain::new().text("B");

        let joined = &a + &b;
        assert_eq!(
            joined.segments(),
            &[Segment::text("A"), Segment::at(1), Segment::text("B")]
        );
        // Operands are untouched.
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_concat_segment() {
        let a = MessageChain::new().text("A");
        let joined = &a + Segment::face(1);
        assert_eq!(joined.segments(), &[Segment::text("A"), Segment::face(1)]);
        assert_eq!(a.len(), 1);

        let joined = a + Segment::dice();
        assert_eq!(joined.segments(), &[Segment::text("A"), Segment::Dice]);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let a = MessageChain::new().text("A").dice();
        assert_eq!(&a + &MessageChain::new(), a);
        assert_eq!(&MessageChain::new() + &a, a);
    }

    #[test]
    fn test_concat_is_associative() {
        let a = MessageChain::new().text("A");
        let b = MessageChain::new().at(1);
        let c = MessageChain::new().face(2);
        assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
    }

    #[test]
    fn test_serialize() {
        let chain = MessageChain::new().text("hi").face(178);
        assert_eq!(
            chain.serialize(),
            r#"[{"type":"text","data":{"text":"hi"}},{"type":"face","data":{"id":178}}]"#
        );
        assert_eq!(MessageChain::new().serialize(), "[]");
    }

    #[test]
    fn test_serialize_keeps_unicode_unescaped() {
        let chain = MessageChain::new().text("你好");
        assert_eq!(chain.serialize(), r#"[{"type":"text","data":{"text":"你好"}}]"#);
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let chain = MessageChain::new()
            .text("你好")
            .at(10001000)
            .at_all()
            .face(178)
            .image("x.png")
            .record("a.mp3")
            .video("v.mp4")
            .dice()
            .rps()
            .poke(PokeMethod::ChuoYiChuo)
            .music("163", "1959667345")
            .custom_music("https://example.com", "https://example.com/a.mp3", "song")
            .reply(42)
            .json(r#"{"app":"test"}"#);

        let parsed = MessageChain::parse(&chain.serialize());
        assert_eq!(parsed, chain);
    }

    #[test]
    fn test_display_preview() {
        let chain = MessageChain::new().text("A").at(1).text("B");
        assert_eq!(chain.display(), "A@1B");

        let chain = MessageChain::new().image("x.png").dice().face(1);
        assert_eq!(chain.display(), "[图片][骰子][表情]");

        // Record, poke and reply are skipped silently.
        let chain = MessageChain::new()
            .reply(1)
            .record("a.mp3")
            .poke(PokeMethod::BiXin)
            .text("ok");
        assert_eq!(chain.display(), "ok");
    }

    #[test]
    fn test_deserialize_dual_format() {
        let chain: MessageChain =
            serde_json::from_str(r#"[{"type":"text","data":{"text":"hi"}}]"#).unwrap();
        assert_eq!(chain.segments(), &[Segment::text("hi")]);

        let chain: MessageChain = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(chain.segments(), &[Segment::text("hello")]);
    }

    #[test]
    fn test_inspection_helpers() {
        let chain = MessageChain::new()
            .reply(99)
            .at(10001000)
            .text("hello ")
            .at_all()
            .text("world");

        assert_eq!(chain.extract_plain_text(), "hello world");
        assert_eq!(chain.mentioned_users(), vec![10001000]);
        assert!(chain.mentions_all());
        assert_eq!(chain.reply_to(), Some("99"));
    }

    #[test]
    fn test_from_implementations() {
        let chain: MessageChain = "hello".into();
        assert_eq!(chain.segments(), &[Segment::text("hello")]);

        let chain: MessageChain = Segment::face(178).into();
        assert_eq!(chain.len(), 1);

        let chain: MessageChain = vec![Segment::text("A"), Segment::text("B")].into();
        assert_eq!(chain.len(), 2);

        let chain: MessageChain = [Segment::dice(), Segment::rps()].into_iter().collect();
        assert_eq!(chain.display(), "[骰子][猜拳]");
    }
}
