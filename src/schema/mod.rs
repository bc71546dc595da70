//! Drawing element schema.
//!
//! Elements are a tagged union: [`Element`] selects the variant by its `type`
//! tag and each payload struct embeds an [`ElementBase`] with the attributes
//! every element shares. Translation to and from the interchange format lives
//! in [`crate::format`]; these types carry no serialization policy of their own
//! beyond the literals of their enumerations.

mod element;
mod style;
mod variants;

pub use element::{
    BoundElement, BoundElementType, Element, ElementBase, ElementId, ElementType, Roundness,
    RoundnessType,
};
pub use style::{Arrowhead, FillStyle, FontFamily, StrokeStyle, TextAlign, VerticalAlign};
pub use variants::{
    FrameElement, FreeDrawElement, GenericElement, ImageElement, ImageStatus, LinearElement, Point,
    PointBinding, TextElement,
};

pub(crate) use variants::{point_value, points_value};
