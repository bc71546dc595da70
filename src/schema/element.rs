//! Element base attributes and the element sum type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::style::{FillStyle, StrokeStyle};
use crate::schema::variants::{
    FrameElement, FreeDrawElement, GenericElement, ImageElement, LinearElement, TextElement,
};

/// Identifier of an element, unique within a document.
pub type ElementId = String;

/// Discriminator written to the `type` field of every element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Rectangle,
    Diamond,
    Ellipse,
    Selection,
    Embeddable,
    Iframe,
    Frame,
    #[serde(rename = "magicframe")]
    MagicFrame,
    Text,
    Line,
    Arrow,
    #[serde(rename = "freedraw")]
    FreeDraw,
    Image,
}

impl ElementType {
    /// Every known element type, in declaration order.
    pub const ALL: [ElementType; 13] = [
        ElementType::Rectangle,
        ElementType::Diamond,
        ElementType::Ellipse,
        ElementType::Selection,
        ElementType::Embeddable,
        ElementType::Iframe,
        ElementType::Frame,
        ElementType::MagicFrame,
        ElementType::Text,
        ElementType::Line,
        ElementType::Arrow,
        ElementType::FreeDraw,
        ElementType::Image,
    ];

    /// The tag literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Rectangle => "rectangle",
            ElementType::Diamond => "diamond",
            ElementType::Ellipse => "ellipse",
            ElementType::Selection => "selection",
            ElementType::Embeddable => "embeddable",
            ElementType::Iframe => "iframe",
            ElementType::Frame => "frame",
            ElementType::MagicFrame => "magicframe",
            ElementType::Text => "text",
            ElementType::Line => "line",
            ElementType::Arrow => "arrow",
            ElementType::FreeDraw => "freedraw",
            ElementType::Image => "image",
        }
    }

    /// Look up a type by its tag literal.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Whether rounded corners of this type use the adaptive radius.
    ///
    /// Used when migrating the legacy `strokeSharpness` field.
    pub fn uses_adaptive_radius(&self) -> bool {
        matches!(
            self,
            ElementType::Rectangle
                | ElementType::Embeddable
                | ElementType::Iframe
                | ElementType::Image
        )
    }

    /// Whether this is a linear (point list) type.
    pub fn is_linear(&self) -> bool {
        matches!(self, ElementType::Line | ElementType::Arrow)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Algorithm used to round an element's corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RoundnessType {
    /// Pre-0.14 rounding (1)
    Legacy,
    /// Radius proportional to the element size (2)
    ProportionalRadius,
    /// Fixed radius, clamped for small elements (3)
    AdaptiveRadius,
}

impl RoundnessType {
    /// Integer code used in the interchange format.
    pub fn code(&self) -> u8 {
        match self {
            RoundnessType::Legacy => 1,
            RoundnessType::ProportionalRadius => 2,
            RoundnessType::AdaptiveRadius => 3,
        }
    }
}

impl TryFrom<u8> for RoundnessType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(RoundnessType::Legacy),
            2 => Ok(RoundnessType::ProportionalRadius),
            3 => Ok(RoundnessType::AdaptiveRadius),
            other => Err(format!("unknown roundness type {other}")),
        }
    }
}

impl From<RoundnessType> for u8 {
    fn from(kind: RoundnessType) -> Self {
        kind.code()
    }
}

/// Corner-rounding descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roundness {
    /// Rounding algorithm.
    #[serde(rename = "type")]
    pub kind: RoundnessType,

    /// Explicit radius, if the algorithm takes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Roundness {
    /// Rounding with the given algorithm and no explicit radius.
    pub fn new(kind: RoundnessType) -> Self {
        Self { kind, value: None }
    }

    /// Default rounding for a freshly rounded element of `element_type`.
    pub fn default_for(element_type: ElementType) -> Self {
        if element_type.uses_adaptive_radius() {
            Self::new(RoundnessType::AdaptiveRadius)
        } else {
            Self::new(RoundnessType::ProportionalRadius)
        }
    }

    pub(crate) fn to_value(self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from(self.kind.code()));
        if let Some(value) = self.value {
            map.insert("value".to_string(), Value::from(value));
        }
        Value::Object(map)
    }
}

/// Kind of a bound element relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundElementType {
    Arrow,
    Text,
}

impl BoundElementType {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundElementType::Arrow => "arrow",
            BoundElementType::Text => "text",
        }
    }
}

/// Another element bound to this one (an arrow attached to a shape, a label
/// inside a container).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundElement {
    /// Id of the bound element.
    pub id: ElementId,

    /// Relation kind.
    #[serde(rename = "type")]
    pub kind: BoundElementType,
}

impl BoundElement {
    /// Create a bound element entry.
    pub fn new(id: impl Into<ElementId>, kind: BoundElementType) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// An arrow bound to the owning element.
    pub fn arrow(id: impl Into<ElementId>) -> Self {
        Self::new(id, BoundElementType::Arrow)
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("type".to_string(), Value::from(self.kind.as_str()));
        Value::Object(map)
    }
}

/// Attributes shared by every element variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBase {
    /// Unique id, stable across edits.
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub roundness: Option<Roundness>,
    pub roughness: f64,
    /// Opacity in percent (0-100).
    pub opacity: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians.
    pub angle: f64,
    /// Seed for reproducible rough rendering.
    pub seed: i64,
    /// Incremented on every edit.
    pub version: i64,
    /// Random tiebreaker between edits with equal `version`.
    pub version_nonce: i64,
    /// Soft-delete flag; deleted elements stay in the document.
    pub is_deleted: bool,
    /// Group memberships, outermost group first.
    pub group_ids: Vec<String>,
    pub frame_id: Option<ElementId>,
    pub bound_elements: Option<Vec<BoundElement>>,
    /// Epoch milliseconds of the last update. Not written by v1 documents.
    pub updated: Option<i64>,
    pub link: Option<String>,
    /// Not written by v1 documents.
    pub locked: Option<bool>,
    /// Opaque data owned by embedding applications.
    pub custom_data: Option<Map<String, Value>>,
    /// Record fields this schema does not name, kept verbatim.
    pub extra: Map<String, Value>,
}

impl ElementBase {
    /// Create a base with the editor's default styling at the origin.
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            stroke_color: "#1e1e1e".to_string(),
            background_color: "transparent".to_string(),
            fill_style: FillStyle::Solid,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            roundness: None,
            roughness: 1.0,
            opacity: 100.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            seed: 1,
            version: 1,
            version_nonce: 0,
            is_deleted: false,
            group_ids: Vec::new(),
            frame_id: None,
            bound_elements: None,
            updated: None,
            link: None,
            locked: None,
            custom_data: None,
            extra: Map::new(),
        }
    }

    /// Set the position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the group memberships (outermost first).
    pub fn with_groups(mut self, group_ids: Vec<String>) -> Self {
        self.group_ids = group_ids;
        self
    }

    /// Whether any field only present in current-generation documents is set.
    pub fn has_current_fields(&self) -> bool {
        self.updated.is_some() || self.locked.is_some()
    }
}

/// One drawing primitive.
///
/// The variant is the element's `type` tag; the payload embeds the shared
/// [`ElementBase`] plus the attributes of its family.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rectangle(GenericElement),
    Diamond(GenericElement),
    Ellipse(GenericElement),
    Selection(GenericElement),
    Embeddable(GenericElement),
    Iframe(GenericElement),
    Frame(FrameElement),
    MagicFrame(FrameElement),
    Text(TextElement),
    Line(LinearElement),
    Arrow(LinearElement),
    FreeDraw(FreeDrawElement),
    Image(ImageElement),
}

impl Element {
    /// The element's type tag.
    pub fn element_type(&self) -> ElementType {
        match self {
            Element::Rectangle(_) => ElementType::Rectangle,
            Element::Diamond(_) => ElementType::Diamond,
            Element::Ellipse(_) => ElementType::Ellipse,
            Element::Selection(_) => ElementType::Selection,
            Element::Embeddable(_) => ElementType::Embeddable,
            Element::Iframe(_) => ElementType::Iframe,
            Element::Frame(_) => ElementType::Frame,
            Element::MagicFrame(_) => ElementType::MagicFrame,
            Element::Text(_) => ElementType::Text,
            Element::Line(_) => ElementType::Line,
            Element::Arrow(_) => ElementType::Arrow,
            Element::FreeDraw(_) => ElementType::FreeDraw,
            Element::Image(_) => ElementType::Image,
        }
    }

    /// Shared attributes.
    pub fn base(&self) -> &ElementBase {
        match self {
            Element::Rectangle(e)
            | Element::Diamond(e)
            | Element::Ellipse(e)
            | Element::Selection(e)
            | Element::Embeddable(e)
            | Element::Iframe(e) => &e.base,
            Element::Frame(e) | Element::MagicFrame(e) => &e.base,
            Element::Text(e) => &e.base,
            Element::Line(e) | Element::Arrow(e) => &e.base,
            Element::FreeDraw(e) => &e.base,
            Element::Image(e) => &e.base,
        }
    }

    /// Mutable shared attributes.
    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Element::Rectangle(e)
            | Element::Diamond(e)
            | Element::Ellipse(e)
            | Element::Selection(e)
            | Element::Embeddable(e)
            | Element::Iframe(e) => &mut e.base,
            Element::Frame(e) | Element::MagicFrame(e) => &mut e.base,
            Element::Text(e) => &mut e.base,
            Element::Line(e) | Element::Arrow(e) => &mut e.base,
            Element::FreeDraw(e) => &mut e.base,
            Element::Image(e) => &mut e.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn is_deleted(&self) -> bool {
        self.base().is_deleted
    }

    /// The text payload, if this is a text element.
    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The linear payload, if this is a line or arrow.
    pub fn as_linear(&self) -> Option<&LinearElement> {
        match self {
            Element::Line(linear) | Element::Arrow(linear) => Some(linear),
            _ => None,
        }
    }
}
