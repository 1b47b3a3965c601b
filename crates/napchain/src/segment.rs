//! Message segment types.
//!
//! A segment is a single typed unit of message content: plain text, an
//! @mention, an image, a sticker, and so on. Each segment has exactly one
//! canonical wire form, the JSON object `{"type": <tag>, "data": {...}}`
//! (data-less kinds omit the `data` key entirely).
//!
//! # Example
//!
//! ```rust,ignore
//! use napchain::Segment;
//!
//! let text = Segment::text("Hello, ");
//! let at = Segment::at(10001000);
//! let face = Segment::face(178);
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Segment Enum - The main message segment type
// ============================================================================

/// A single message segment.
///
/// Segments have value semantics: two segments with equal variant and
/// payload are interchangeable, and their identity is their serialized
/// form. The wire representation is adjacently tagged with the field
/// names expected by the gateway (`qq` for mentions, `file` for media,
/// and so on); kinds outside the modeled set are carried verbatim as
/// [`Segment::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Plain text content.
    Text(TextData),
    /// QQ emoji/face.
    Face(FaceData),
    /// Image (local path or URI).
    Image(ImageData),
    /// Voice clip.
    Record(RecordData),
    /// Video.
    Video(VideoData),
    /// @mention of one user, or everyone via the `"all"` sentinel.
    At(AtData),
    /// Rock-paper-scissors magic emoji.
    Rps,
    /// Dice magic emoji.
    Dice,
    /// Interactive poke gesture.
    Poke(PokeData),
    /// Music card, platform-hosted or custom.
    Music(MusicData),
    /// Reply referencing a prior message.
    Reply(ReplyData),
    /// Opaque pre-serialized structured payload.
    Json(JsonData),
    /// A segment kind outside the modeled set, preserved verbatim.
    ///
    /// Gateways emit kinds this crate does not model (`shake`, `forward`,
    /// `node`, ...). They round-trip untouched and contribute nothing to
    /// the preview.
    Unknown(serde_json::Value),
}

// ============================================================================
// Serialization / Deserialization
// ============================================================================
//
// The wire form is `{"type": <tag>, "data": {...}}`, with the `data` key
// omitted for data-less kinds. Unknown kinds must pass through verbatim,
// so the impls are written by hand instead of derived.

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    tag: &'static str,
    data: &'a T,
}

#[derive(Serialize)]
struct TagOnly {
    #[serde(rename = "type")]
    tag: &'static str,
}

impl Serialize for Segment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Segment::Text(data) => Tagged { tag: "text", data }.serialize(serializer),
            Segment::Face(data) => Tagged { tag: "face", data }.serialize(serializer),
            Segment::Image(data) => Tagged { tag: "image", data }.serialize(serializer),
            Segment::Record(data) => Tagged { tag: "record", data }.serialize(serializer),
            Segment::Video(data) => Tagged { tag: "video", data }.serialize(serializer),
            Segment::At(data) => Tagged { tag: "at", data }.serialize(serializer),
            Segment::Rps => TagOnly { tag: "rps" }.serialize(serializer),
            Segment::Dice => TagOnly { tag: "dice" }.serialize(serializer),
            Segment::Poke(data) => Tagged { tag: "poke", data }.serialize(serializer),
            Segment::Music(data) => Tagged { tag: "music", data }.serialize(serializer),
            Segment::Reply(data) => Tagged { tag: "reply", data }.serialize(serializer),
            Segment::Json(data) => Tagged { tag: "json", data }.serialize(serializer),
            Segment::Unknown(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Segment::from_wire)
    }
}

impl Segment {
    /// Interprets one wire element.
    ///
    /// Elements matching a modeled kind become that variant; everything
    /// else is kept verbatim, so deserializing a segment never fails on
    /// shape.
    fn from_wire(value: serde_json::Value) -> Self {
        fn data<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
            serde_json::from_value(value.get("data")?.clone()).ok()
        }

        let tag = value.get("type").and_then(serde_json::Value::as_str);
        let segment = match tag {
            Some("text") => data(&value).map(Segment::Text),
            Some("face") => data(&value).map(Segment::Face),
            Some("image") => data(&value).map(Segment::Image),
            Some("record") => data(&value).map(Segment::Record),
            Some("video") => data(&value).map(Segment::Video),
            Some("at") => data(&value).map(Segment::At),
            Some("rps") => Some(Segment::Rps),
            Some("dice") => Some(Segment::Dice),
            Some("poke") => data(&value).map(Segment::Poke),
            Some("music") => data(&value).map(Segment::Music),
            Some("reply") => data(&value).map(Segment::Reply),
            Some("json") => data(&value).map(Segment::Json),
            _ => None,
        };
        segment.unwrap_or_else(|| Segment::Unknown(value))
    }
}

impl fmt::Display for Segment {
    /// Writes the segment's preview fragment.
    ///
    /// This is a lossy summary for logs: media kinds collapse to fixed
    /// placeholders, and kinds without a defined preview (poke, reply,
    /// record) contribute nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Text(data) => write!(f, "{}", data.text),
            Segment::Face(_) => write!(f, "[表情]"),
            Segment::Image(_) => write!(f, "[图片]"),
            Segment::Video(_) => write!(f, "[视频]"),
            Segment::At(data) => write!(f, "@{}", data.qq),
            Segment::Rps => write!(f, "[猜拳]"),
            Segment::Dice => write!(f, "[骰子]"),
            Segment::Music(_) => write!(f, "[音乐]"),
            Segment::Json(_) => write!(f, "[JSON]"),
            // No preview text defined for these kinds.
            Segment::Record(_) | Segment::Poke(_) | Segment::Reply(_) | Segment::Unknown(_) => {
                Ok(())
            }
        }
    }
}

// ============================================================================
// Segment Builder Methods
// ============================================================================

impl Segment {
    /// Creates a plain text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(TextData { text: text.into() })
    }

    /// Creates a QQ face/emoji segment.
    pub fn face(id: i64) -> Self {
        Segment::Face(FaceData { id })
    }

    /// Creates an image segment from a file path or URL.
    pub fn image(file: impl Into<String>) -> Self {
        Segment::Image(ImageData { file: file.into() })
    }

    /// Creates a voice clip segment.
    pub fn record(file: impl Into<String>) -> Self {
        Segment::Record(RecordData { file: file.into() })
    }

    /// Creates a video segment.
    pub fn video(file: impl Into<String>) -> Self {
        Segment::Video(VideoData { file: file.into() })
    }

    /// Creates an @mention segment for a specific user.
    ///
    /// Accepts a numeric QQ ID or a string target; numeric targets stay
    /// numeric on the wire.
    pub fn at(target: impl Into<AtTarget>) -> Self {
        Segment::At(AtData { qq: target.into() })
    }

    /// Creates an @all segment to mention everyone.
    pub fn at_all() -> Self {
        Segment::At(AtData {
            qq: AtTarget::Name("all".to_string()),
        })
    }

    /// Creates a rock-paper-scissors segment.
    pub fn rps() -> Self {
        Segment::Rps
    }

    /// Creates a dice segment.
    pub fn dice() -> Self {
        Segment::Dice
    }

    /// Creates a poke segment.
    pub fn poke(method: impl Into<PokeMethod>) -> Self {
        Segment::Poke(PokeData {
            method: method.into(),
        })
    }

    /// Creates a music card for a platform-hosted track.
    pub fn music(music_type: impl Into<String>, id: impl Into<String>) -> Self {
        Segment::Music(MusicData {
            music_type: music_type.into(),
            id: Some(id.into()),
            url: None,
            audio: None,
            title: None,
            image: None,
            singer: None,
        })
    }

    /// Creates a custom music card with no cover image or singer.
    pub fn custom_music(
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::custom_music_with_cover(url, audio, title, "", "")
    }

    /// Creates a custom music card with cover image and singer.
    pub fn custom_music_with_cover(
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
        image: impl Into<String>,
        singer: impl Into<String>,
    ) -> Self {
        Segment::Music(MusicData {
            music_type: "custom".to_string(),
            id: None,
            url: Some(url.into()),
            audio: Some(audio.into()),
            title: Some(title.into()),
            image: Some(image.into()),
            singer: Some(singer.into()),
        })
    }

    /// Creates a reply segment referencing another message.
    ///
    /// The message ID is coerced to a string, whatever its source type.
    pub fn reply(message_id: impl ToString) -> Self {
        Segment::Reply(ReplyData {
            id: message_id.to_string(),
        })
    }

    /// Creates a JSON message segment from a pre-serialized payload.
    pub fn json(data: impl Into<String>) -> Self {
        Segment::Json(JsonData { data: data.into() })
    }

    /// Returns the text content if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(data) => Some(&data.text),
            _ => None,
        }
    }
}

// ============================================================================
// At Target
// ============================================================================

/// Target of an @mention: a numeric QQ ID or a string sentinel.
///
/// The gateway accepts both forms under the `qq` field; `"all"` mentions
/// every group member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtTarget {
    /// Numeric user ID.
    Id(i64),
    /// String target, normally the `"all"` sentinel.
    Name(String),
}

impl AtTarget {
    /// Whether this target is the `"all"` sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, AtTarget::Name(name) if name == "all")
    }

    /// The numeric user ID, if this target is one.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            AtTarget::Id(id) => Some(*id),
            AtTarget::Name(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for AtTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtTarget::Id(id) => write!(f, "{id}"),
            AtTarget::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<i64> for AtTarget {
    fn from(id: i64) -> Self {
        AtTarget::Id(id)
    }
}

impl From<&str> for AtTarget {
    fn from(name: &str) -> Self {
        AtTarget::Name(name.to_string())
    }
}

impl From<String> for AtTarget {
    fn from(name: String) -> Self {
        AtTarget::Name(name)
    }
}

// ============================================================================
// Poke Method
// ============================================================================

/// Poke gesture variants understood by the gateway.
///
/// The wire form is the gesture name as a plain string; unrecognized
/// names round-trip through [`PokeMethod::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum PokeMethod {
    /// The default "poke poke" gesture.
    ChuoYiChuo,
    /// Finger heart.
    BiXin,
    /// Double tap.
    DianDian,
    /// Any other gesture name, passed through verbatim.
    Other(String),
}

impl PokeMethod {
    /// The wire name of this gesture.
    pub fn as_str(&self) -> &str {
        match self {
            PokeMethod::ChuoYiChuo => "ChuoYiChuo",
            PokeMethod::BiXin => "BiXin",
            PokeMethod::DianDian => "DianDian",
            PokeMethod::Other(name) => name,
        }
    }
}

impl From<&str> for PokeMethod {
    fn from(name: &str) -> Self {
        match name {
            "ChuoYiChuo" => PokeMethod::ChuoYiChuo,
            "BiXin" => PokeMethod::BiXin,
            "DianDian" => PokeMethod::DianDian,
            other => PokeMethod::Other(other.to_string()),
        }
    }
}

impl From<String> for PokeMethod {
    fn from(name: String) -> Self {
        PokeMethod::from(name.as_str())
    }
}

impl fmt::Display for PokeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PokeMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PokeMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(PokeMethod::from)
    }
}

// ============================================================================
// Segment Data Types
// ============================================================================

/// Plain text segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// The text content.
    pub text: String,
}

/// QQ face/emoji segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceData {
    /// The face ID. See QQ face ID table.
    pub id: i64,
}

/// Image segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image file path or URL.
    pub file: String,
}

/// Voice clip segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    /// Audio file path or URL.
    pub file: String,
}

/// Video segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoData {
    /// Video file path or URL.
    pub file: String,
}

/// @mention segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtData {
    /// QQ number or "all" for @everyone.
    pub qq: AtTarget,
}

/// Poke segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokeData {
    /// The gesture to perform.
    #[serde(rename = "type")]
    pub method: PokeMethod,
}

/// Music card segment data.
///
/// Platform-hosted cards carry `music_type` + `id`; custom cards carry
/// `music_type = "custom"` plus the URL/audio/title/image/singer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicData {
    /// Music platform: "qq", "163", or "custom".
    #[serde(rename = "type")]
    pub music_type: String,
    /// Track ID (platform-hosted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Click-through URL (custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Audio URL (custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Card title (custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Cover image URL (custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Singer name (custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singer: Option<String>,
}

/// Reply segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyData {
    /// Message ID to reply to.
    pub id: String,
}

/// JSON message segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonData {
    /// Pre-serialized JSON content.
    pub data: String,
}

// ============================================================================
// Tests
// ============================================================================
