//! Typed wire responses for the document-text and celebrity endpoints.
//!
//! Field names follow the AWS JSON 1.1 payloads (PascalCase). Document
//! types keep every member they do not model in an `extra` map, so a cached
//! response carries the same keys and values the service returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which remote operation produced (or should produce) a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// `DetectDocumentText`
    Document,
    /// `RecognizeCelebrities`
    Celebrities,
}

/// A response from either remote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionResponse {
    Document(DetectDocumentTextResponse),
    Celebrities(RecognizeCelebritiesResponse),
}

impl RecognitionResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Document(_) => ResponseKind::Document,
            Self::Celebrities(_) => ResponseKind::Celebrities,
        }
    }
}

/// What a cold response cache hands back after warming itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Write the fetched response and return an empty one; the next run reads it.
    #[default]
    WarmOnly,
    /// Write the fetched response and return it immediately.
    ReturnFetched,
}

impl std::str::FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warm-only" | "warm_only" => Ok(Self::WarmOnly),
            "return-fetched" | "return_fetched" => Ok(Self::ReturnFetched),
            other => Err(format!("unknown cache mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Document text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectDocumentTextResponse {
    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_document_text_model_version: Option<String>,

    /// Members not modelled above (`ResponseMetadata`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    #[serde(default)]
    pub pages: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One unit of recognized content (page, line, word, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub block_type: BlockType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// `PRINTED` or `HANDWRITING`, only set on words.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// `RowIndex`, `EntityTypes`, `Query`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            block_type,
            id: None,
            text: Some(text.into()),
            confidence: None,
            text_type: None,
            page: None,
            geometry: None,
            relationships: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Serialized as the service's tag (`LINE`, `KEY_VALUE_SET`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Page,
    Line,
    Word,
    KeyValueSet,
    Table,
    Cell,
    MergedCell,
    SelectionElement,
    Title,
    Query,
    QueryResult,
    Signature,
    /// Any tag this crate does not model, kept verbatim.
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "PAGE",
            Self::Line => "LINE",
            Self::Word => "WORD",
            Self::KeyValueSet => "KEY_VALUE_SET",
            Self::Table => "TABLE",
            Self::Cell => "CELL",
            Self::MergedCell => "MERGED_CELL",
            Self::SelectionElement => "SELECTION_ELEMENT",
            Self::Title => "TITLE",
            Self::Query => "QUERY",
            Self::QueryResult => "QUERY_RESULT",
            Self::Signature => "SIGNATURE",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PAGE" => Self::Page,
            "LINE" => Self::Line,
            "WORD" => Self::Word,
            "KEY_VALUE_SET" => Self::KeyValueSet,
            "TABLE" => Self::Table,
            "CELL" => Self::Cell,
            "MERGED_CELL" => Self::MergedCell,
            "SELECTION_ELEMENT" => Self::SelectionElement,
            "TITLE" => Self::Title,
            "QUERY" => Self::Query,
            "QUERY_RESULT" => Self::QueryResult,
            "SIGNATURE" => Self::Signature,
            _ => Self::Other(tag),
        }
    }
}

impl From<BlockType> for String {
    fn from(kind: BlockType) -> Self {
        match kind {
            BlockType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub polygon: Vec<Point>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Celebrities
// ---------------------------------------------------------------------------

/// Normalized rectangle; every coordinate is a ratio of the image size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecognizeCelebritiesResponse {
    #[serde(default)]
    pub celebrity_faces: Vec<Celebrity>,

    #[serde(default)]
    pub unrecognized_faces: Vec<ComparedFace>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_correction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Celebrity {
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<ComparedFace>,

    /// 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_gender: Option<KnownGender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComparedFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Confidence that the box contains a face, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<ImageQuality>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<Emotion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<Smile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Landmark {
    #[serde(rename = "Type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pose {
    pub roll: f64,
    pub yaw: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageQuality {
    pub brightness: f64,
    pub sharpness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Emotion {
    /// `HAPPY`, `CALM`, `SURPRISED`, ...
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Smile {
    pub value: bool,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownGender {
    #[serde(rename = "Type")]
    pub kind: String,
}

/// A face ready to be drawn: where it is, what to call it, how sure we are.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRecord {
    pub bounding_box: BoundingBox,
    pub label: String,
    pub confidence: f64,
}

impl FaceRecord {
    pub fn new(bounding_box: BoundingBox, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            bounding_box,
            label: label.into(),
            confidence,
        }
    }
}
