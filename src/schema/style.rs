//! Enumerated style attributes shared by drawing elements.
//!
//! Every enum here is written to disk as the exact literal Excalidraw uses:
//! lowercase strings for fill/stroke/alignment, small integers for fonts.

use serde::{Deserialize, Serialize};

/// Fill pattern used for an element's background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    /// Rough diagonal hatching
    Hachure,
    /// Hatching in both directions
    CrossHatch,
    /// Flat fill
    #[default]
    Solid,
    /// Zigzag strokes
    Zigzag,
}

impl FillStyle {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillStyle::Hachure => "hachure",
            FillStyle::CrossHatch => "cross-hatch",
            FillStyle::Solid => "solid",
            FillStyle::Zigzag => "zigzag",
        }
    }
}

/// Dash pattern of an element's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeStyle::Solid => "solid",
            StrokeStyle::Dashed => "dashed",
            StrokeStyle::Dotted => "dotted",
        }
    }
}

/// Font family of a text element.
///
/// Encoded as a small integer. Families introduced after Cascadia are kept
/// as [`FontFamily::Other`] so that documents written by newer editors still
/// open and save without losing the choice.
///
/// Families compare and hash by [`FontFamily::id`]: `Other(2)` is the same
/// family as `Helvetica`. Build from an id with [`FontFamily::from`], which
/// always yields the named variant for ids 1 to 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(from = "i64", into = "i64")]
pub enum FontFamily {
    /// Hand-drawn font (1)
    #[default]
    Virgil,
    /// Normal sans-serif (2)
    Helvetica,
    /// Monospace (3)
    Cascadia,
    /// Any other family id, normally above 3
    Other(i64),
}

impl PartialEq for FontFamily {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for FontFamily {}

impl std::hash::Hash for FontFamily {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl FontFamily {
    /// Integer id used in the interchange format.
    pub fn id(&self) -> i64 {
        match self {
            FontFamily::Virgil => 1,
            FontFamily::Helvetica => 2,
            FontFamily::Cascadia => 3,
            FontFamily::Other(id) => *id,
        }
    }
}

impl From<i64> for FontFamily {
    fn from(id: i64) -> Self {
        match id {
            1 => FontFamily::Virgil,
            2 => FontFamily::Helvetica,
            3 => FontFamily::Cascadia,
            other => FontFamily::Other(other),
        }
    }
}

impl From<FontFamily> for i64 {
    fn from(family: FontFamily) -> Self {
        family.id()
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Arrowhead drawn at either end of a linear element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrowhead {
    Arrow,
    Bar,
    /// Older name for a filled circle
    Dot,
    Circle,
    CircleOutline,
    Triangle,
    TriangleOutline,
    Diamond,
    DiamondOutline,
}

impl Arrowhead {
    /// Literal used in the interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arrowhead::Arrow => "arrow",
            Arrowhead::Bar => "bar",
            Arrowhead::Dot => "dot",
            Arrowhead::Circle => "circle",
            Arrowhead::CircleOutline => "circle_outline",
            Arrowhead::Triangle => "triangle",
            Arrowhead::TriangleOutline => "triangle_outline",
            Arrowhead::Diamond => "diamond",
            Arrowhead::DiamondOutline => "diamond_outline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_style_literals() {
        let json = serde_json::to_string(&FillStyle::CrossHatch).unwrap();
        assert_eq!(json, "\"cross-hatch\"");
        assert_eq!(FillStyle::CrossHatch.as_str(), "cross-hatch");

        let parsed: FillStyle = serde_json::from_str("\"hachure\"").unwrap();
        assert_eq!(parsed, FillStyle::Hachure);
    }

    #[test]
    fn test_font_family_ids() {
        let parsed: FontFamily = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, FontFamily::Virgil);
        assert_eq!(FontFamily::Cascadia.id(), 3);

        // Newer font ids are kept verbatim
        let newer: FontFamily = serde_json::from_str("5").unwrap();
        assert_eq!(newer, FontFamily::Other(5));
        assert_eq!(serde_json::to_string(&newer).unwrap(), "5");
    }

    #[test]
    fn test_font_family_other_with_known_id() {
        assert_eq!(FontFamily::Other(2), FontFamily::Helvetica);
        assert_ne!(FontFamily::Other(4), FontFamily::Helvetica);
        assert_eq!(FontFamily::from(3), FontFamily::Cascadia);
        assert!(matches!(FontFamily::from(3), FontFamily::Cascadia));

        let reread: FontFamily =
            serde_json::from_str(&serde_json::to_string(&FontFamily::Other(1)).unwrap()).unwrap();
        assert!(matches!(reread, FontFamily::Virgil));
        assert_eq!(reread, FontFamily::Other(1));

        let families: std::collections::HashSet<FontFamily> =
            [FontFamily::Other(2), FontFamily::Helvetica].into_iter().collect();
        assert_eq!(families.len(), 1);
    }

    #[test]
    fn test_arrowhead_literals_match_serde() {
        for head in [
            Arrowhead::Arrow,
            Arrowhead::CircleOutline,
            Arrowhead::TriangleOutline,
            Arrowhead::DiamondOutline,
        ] {
            let json = serde_json::to_string(&head).unwrap();
            assert_eq!(json, format!("\"{}\"", head.as_str()));
        }
    }

    #[test]
    fn test_unknown_stroke_style_rejected() {
        assert!(serde_json::from_str::<StrokeStyle>("\"wavy\"").is_err());
    }
}
