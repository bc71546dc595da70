//! Per-family element payloads.
//!
//! Each payload embeds the shared [`ElementBase`] and adds the attributes of
//! its family. Several type tags share one payload (a rectangle and an
//! ellipse carry exactly the same data).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::element::{ElementBase, ElementId};
use crate::schema::style::{Arrowhead, FontFamily, TextAlign, VerticalAlign};

/// A point relative to the element's `x`/`y`, written as `[x, y]`.
pub type Point = [f64; 2];

/// Payload of shapes without family-specific attributes
/// (rectangle, diamond, ellipse, selection, embeddable, iframe).
#[derive(Debug, Clone, PartialEq)]
pub struct GenericElement {
    pub base: ElementBase,
}

impl GenericElement {
    pub fn new(base: ElementBase) -> Self {
        Self { base }
    }
}

/// Payload of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameElement {
    pub base: ElementBase,
    /// Display name; `None` shows the default label.
    pub name: Option<String>,
}

impl FrameElement {
    pub fn new(base: ElementBase) -> Self {
        Self { base, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Payload of text elements.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub base: ElementBase,
    pub font_size: f64,
    pub font_family: FontFamily,
    /// Text as displayed (after wrapping).
    pub text: String,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    /// Element this text is a label of.
    pub container_id: Option<ElementId>,
    /// Text before wrapping.
    pub original_text: Option<String>,
    /// Unitless line height; multiply by `font_size` for pixels.
    pub line_height: Option<f64>,
}

impl TextElement {
    /// Create a top-left aligned Virgil text at the default size.
    pub fn new(base: ElementBase, text: impl Into<String>) -> Self {
        Self {
            base,
            font_size: 20.0,
            font_family: FontFamily::Virgil,
            text: text.into(),
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            container_id: None,
            original_text: None,
            line_height: None,
        }
    }

    /// Bind the text inside a container element.
    pub fn in_container(mut self, container_id: impl Into<ElementId>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Line height in pixels, when a line-height multiplier is recorded.
    pub fn line_height_px(&self) -> Option<f64> {
        self.line_height.map(|h| h * self.font_size)
    }
}

/// Where an end of a linear element is attached to another element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointBinding {
    /// Element the end is bound to.
    pub element_id: ElementId,
    pub focus: f64,
    pub gap: f64,
    /// Fixed attachment ratio within the target, for elbow arrows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_point: Option<Point>,
}

impl PointBinding {
    pub fn new(element_id: impl Into<ElementId>, focus: f64, gap: f64) -> Self {
        Self {
            element_id: element_id.into(),
            focus,
            gap,
            fixed_point: None,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "elementId".to_string(),
            Value::from(self.element_id.clone()),
        );
        map.insert("focus".to_string(), Value::from(self.focus));
        map.insert("gap".to_string(), Value::from(self.gap));
        if let Some(point) = self.fixed_point {
            map.insert("fixedPoint".to_string(), point_value(point));
        }
        Value::Object(map)
    }
}

/// Payload of lines and arrows.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearElement {
    pub base: ElementBase,
    pub points: Vec<Point>,
    pub last_committed_point: Option<Point>,
    pub start_binding: Option<PointBinding>,
    pub end_binding: Option<PointBinding>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

impl LinearElement {
    pub fn new(base: ElementBase, points: Vec<Point>) -> Self {
        Self {
            base,
            points,
            last_committed_point: None,
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
        }
    }

    /// Ids of the elements either end is bound to.
    pub fn bound_ids(&self) -> impl Iterator<Item = &str> {
        self.start_binding
            .iter()
            .chain(self.end_binding.iter())
            .map(|b| b.element_id.as_str())
    }
}

/// Payload of free-hand strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeDrawElement {
    pub base: ElementBase,
    pub points: Vec<Point>,
    /// Pen pressure per point; empty when pressure is simulated.
    pub pressures: Vec<f64>,
    pub simulate_pressure: bool,
    pub last_committed_point: Option<Point>,
}

impl FreeDrawElement {
    pub fn new(base: ElementBase, points: Vec<Point>) -> Self {
        Self {
            base,
            points,
            pressures: Vec::new(),
            simulate_pressure: true,
            last_committed_point: None,
        }
    }
}

/// Upload state of an image's binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    #[default]
    Pending,
    Saved,
    Error,
}

impl ImageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStatus::Pending => "pending",
            ImageStatus::Saved => "saved",
            ImageStatus::Error => "error",
        }
    }
}

/// Payload of embedded images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub base: ElementBase,
    /// Key into the file envelope's `files` map.
    pub file_id: Option<String>,
    pub status: ImageStatus,
    /// Horizontal and vertical flip factors.
    pub scale: [f64; 2],
}

impl ImageElement {
    pub fn new(base: ElementBase, file_id: impl Into<String>) -> Self {
        Self {
            base,
            file_id: Some(file_id.into()),
            status: ImageStatus::Pending,
            scale: [1.0, 1.0],
        }
    }
}

pub(crate) fn point_value(point: Point) -> Value {
    Value::Array(vec![Value::from(point[0]), Value::from(point[1])])
}

pub(crate) fn points_value(points: &[Point]) -> Value {
    Value::Array(points.iter().copied().map(point_value).collect())
}
