//! Element and document codec.
//!
//! Decoding reads one JSON object per element and selects the variant from
//! its `type` tag. Optional fields that are absent or `null` decode to `None`;
//! on encode they are omitted. Keys the schema does not know are carried in
//! [`ElementBase::extra`] and written back unchanged.
//!
//! Two legacy spellings are migrated while decoding and never written back:
//!
//! - `strokeSharpness: "round" | "sharp"` (before `roundness` existed)
//! - `boundElementIds: [id, ...]` (before `boundElements` existed)

use serde_json::Value;

use crate::format::error::DecodeError;
use crate::format::generation::FormatGeneration;
use crate::format::record::{RecordReader, RecordWriter};
use crate::schema::{
    BoundElement, Element, ElementBase, ElementType, FrameElement, FreeDrawElement,
    GenericElement, ImageElement, LinearElement, Roundness, TextElement, point_value,
    points_value,
};

/// Decode a single element record.
///
/// Fails with [`DecodeError::UnknownVariant`] for an unrecognized `type` tag
/// (unknown variants are never passed through), with
/// [`DecodeError::MissingRequiredField`] when a required attribute is absent
/// and with [`DecodeError::MalformedValue`] when a field has the wrong shape.
pub fn decode_element(raw: &Value) -> Result<Element, DecodeError> {
    let record = raw
        .as_object()
        .ok_or_else(|| DecodeError::malformed("element", "object"))?;
    let mut reader = RecordReader::new(record);

    let tag: String = reader.required("type", "element type string")?;
    let element_type =
        ElementType::from_tag(&tag).ok_or_else(|| DecodeError::unknown_variant(&tag))?;

    let base = decode_base(&mut reader, element_type)?;

    let mut element = match element_type {
        ElementType::Rectangle => Element::Rectangle(GenericElement::new(base)),
        ElementType::Diamond => Element::Diamond(GenericElement::new(base)),
        ElementType::Ellipse => Element::Ellipse(GenericElement::new(base)),
        ElementType::Selection => Element::Selection(GenericElement::new(base)),
        ElementType::Embeddable => Element::Embeddable(GenericElement::new(base)),
        ElementType::Iframe => Element::Iframe(GenericElement::new(base)),
        ElementType::Frame => Element::Frame(decode_frame(&mut reader, base)?),
        ElementType::MagicFrame => Element::MagicFrame(decode_frame(&mut reader, base)?),
        ElementType::Text => Element::Text(decode_text(&mut reader, base)?),
        ElementType::Line => Element::Line(decode_linear(&mut reader, base)?),
        ElementType::Arrow => Element::Arrow(decode_linear(&mut reader, base)?),
        ElementType::FreeDraw => Element::FreeDraw(decode_freedraw(&mut reader, base)?),
        ElementType::Image => Element::Image(decode_image(&mut reader, base)?),
    };

    element.base_mut().extra = reader.remaining();
    Ok(element)
}

/// Encode a single element for the given format generation.
///
/// Every base and variant attribute is written; absent optionals are omitted.
/// For [`FormatGeneration::V1`] the `updated` and `locked` fields are left out.
pub fn encode_element(element: &Element, generation: FormatGeneration) -> Value {
    let base = element.base();
    let mut writer = RecordWriter::new();

    writer.put("id", base.id.clone());
    writer.put("type", element.element_type().as_str());
    encode_base(&mut writer, base, generation);

    match element {
        Element::Rectangle(_)
        | Element::Diamond(_)
        | Element::Ellipse(_)
        | Element::Selection(_)
        | Element::Embeddable(_)
        | Element::Iframe(_) => {}
        Element::Frame(frame) | Element::MagicFrame(frame) => {
            writer.put_opt("name", frame.name.clone());
        }
        Element::Text(text) => encode_text(&mut writer, text),
        Element::Line(linear) | Element::Arrow(linear) => encode_linear(&mut writer, linear),
        Element::FreeDraw(freedraw) => encode_freedraw(&mut writer, freedraw),
        Element::Image(image) => encode_image(&mut writer, image),
    }

    // Legacy spellings are migrated on decode and never written back
    writer.skip("strokeSharpness");
    writer.skip("boundElementIds");

    writer.finish(&base.extra)
}

/// Decode an array of element records, preserving order.
///
/// All-or-nothing: the first failing record aborts the whole decode and the
/// error carries that record's index.
pub fn decode_document(raw: &Value) -> Result<Vec<Element>, DecodeError> {
    let records = raw
        .as_array()
        .ok_or_else(|| DecodeError::malformed("elements", "array of element records"))?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| decode_element(record).map_err(|e| e.at(index)))
        .collect()
}

/// Encode elements as an array in exactly the given order.
pub fn encode_document(elements: &[Element], generation: FormatGeneration) -> Value {
    Value::Array(
        elements
            .iter()
            .map(|element| encode_element(element, generation))
            .collect(),
    )
}

fn decode_base(
    reader: &mut RecordReader<'_>,
    element_type: ElementType,
) -> Result<ElementBase, DecodeError> {
    let id: String = reader.required("id", "string")?;
    let x = reader.required("x", "number")?;
    let y = reader.required("y", "number")?;
    let stroke_color = reader.required("strokeColor", "color string")?;
    let background_color = reader.required("backgroundColor", "color string")?;
    let fill_style = reader.required(
        "fillStyle",
        "one of \"hachure\", \"cross-hatch\", \"solid\", \"zigzag\"",
    )?;
    let stroke_width = reader.required("strokeWidth", "number")?;
    let stroke_style =
        reader.required("strokeStyle", "one of \"solid\", \"dashed\", \"dotted\"")?;

    let has_roundness = reader.contains("roundness");
    let roundness: Option<Roundness> =
        reader.optional("roundness", "roundness object with type 1, 2 or 3")?;
    let sharpness = reader.take("strokeSharpness");
    let roundness = if has_roundness {
        roundness
    } else {
        migrate_stroke_sharpness(sharpness, element_type)?
    };

    let roughness = reader.required("roughness", "number")?;
    let opacity = reader.required("opacity", "number")?;
    let width = reader.required("width", "number")?;
    let height = reader.required("height", "number")?;
    let angle = reader.required("angle", "number")?;
    let seed = reader.required_integer("seed")?;
    let version = reader.required_integer("version")?;
    let version_nonce = reader.required_integer("versionNonce")?;
    let is_deleted = reader.required("isDeleted", "boolean")?;
    let group_ids = reader.required("groupIds", "array of group id strings")?;
    let frame_id = reader.optional("frameId", "element id string")?;

    let has_bound_elements = reader.contains("boundElements");
    let bound_elements: Option<Vec<BoundElement>> =
        reader.optional("boundElements", "array of {id, type} bound element objects")?;
    let legacy_bound_ids: Option<Vec<String>> =
        reader.optional("boundElementIds", "array of element id strings")?;
    let bound_elements = if has_bound_elements {
        bound_elements
    } else {
        legacy_bound_ids.map(|ids| ids.into_iter().map(BoundElement::arrow).collect())
    };

    let updated = reader.optional_integer("updated")?;
    let link = reader.optional("link", "string")?;
    let locked = reader.optional("locked", "boolean")?;
    let custom_data = reader.optional_object("customData")?;

    Ok(ElementBase {
        id,
        x,
        y,
        stroke_color,
        background_color,
        fill_style,
        stroke_width,
        stroke_style,
        roundness,
        roughness,
        opacity,
        width,
        height,
        angle,
        seed,
        version,
        version_nonce,
        is_deleted,
        group_ids,
        frame_id,
        bound_elements,
        updated,
        link,
        locked,
        custom_data,
        extra: serde_json::Map::new(),
    })
}

fn migrate_stroke_sharpness(
    sharpness: Option<&Value>,
    element_type: ElementType,
) -> Result<Option<Roundness>, DecodeError> {
    match sharpness {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s == "round" => Ok(Some(Roundness::default_for(element_type))),
        Some(Value::String(s)) if s == "sharp" => Ok(None),
        Some(_) => Err(DecodeError::malformed(
            "strokeSharpness",
            "\"round\" or \"sharp\"",
        )),
    }
}

fn encode_base(writer: &mut RecordWriter, base: &ElementBase, generation: FormatGeneration) {
    writer.put("x", base.x);
    writer.put("y", base.y);
    writer.put("width", base.width);
    writer.put("height", base.height);
    writer.put("angle", base.angle);
    writer.put("strokeColor", base.stroke_color.clone());
    writer.put("backgroundColor", base.background_color.clone());
    writer.put("fillStyle", base.fill_style.as_str());
    writer.put("strokeWidth", base.stroke_width);
    writer.put("strokeStyle", base.stroke_style.as_str());
    writer.put("roughness", base.roughness);
    writer.put("opacity", base.opacity);
    writer.put("groupIds", base.group_ids.clone());
    writer.put_opt("frameId", base.frame_id.clone());
    writer.put_opt("roundness", base.roundness.map(Roundness::to_value));
    writer.put("seed", base.seed);
    writer.put("version", base.version);
    writer.put("versionNonce", base.version_nonce);
    writer.put("isDeleted", base.is_deleted);
    writer.put_opt(
        "boundElements",
        base.bound_elements
            .as_ref()
            .map(|bound| bound.iter().map(BoundElement::to_value).collect::<Vec<_>>()),
    );

    if generation.supports_field("updated") {
        writer.put_opt("updated", base.updated);
    } else {
        writer.skip("updated");
    }

    writer.put_opt("link", base.link.clone());

    if generation.supports_field("locked") {
        writer.put_opt("locked", base.locked);
    } else {
        writer.skip("locked");
    }

    writer.put_opt("customData", base.custom_data.clone().map(Value::Object));
}

fn decode_frame(
    reader: &mut RecordReader<'_>,
    base: ElementBase,
) -> Result<FrameElement, DecodeError> {
    Ok(FrameElement {
        base,
        name: reader.optional("name", "string")?,
    })
}

fn decode_text(
    reader: &mut RecordReader<'_>,
    base: ElementBase,
) -> Result<TextElement, DecodeError> {
    Ok(TextElement {
        base,
        font_size: reader.required("fontSize", "number")?,
        font_family: reader.required("fontFamily", "font family integer")?,
        text: reader.required("text", "string")?,
        text_align: reader.required("textAlign", "one of \"left\", \"center\", \"right\"")?,
        vertical_align: reader
            .required("verticalAlign", "one of \"top\", \"middle\", \"bottom\"")?,
        container_id: reader.optional("containerId", "element id string")?,
        original_text: reader.optional("originalText", "string")?,
        line_height: reader.optional("lineHeight", "number")?,
    })
}

fn encode_text(writer: &mut RecordWriter, text: &TextElement) {
    writer.put("fontSize", text.font_size);
    writer.put("fontFamily", text.font_family.id());
    writer.put("text", text.text.clone());
    writer.put("textAlign", text.text_align.as_str());
    writer.put("verticalAlign", text.vertical_align.as_str());
    writer.put_opt("containerId", text.container_id.clone());
    writer.put_opt("originalText", text.original_text.clone());
    writer.put_opt("lineHeight", text.line_height);
}

fn decode_linear(
    reader: &mut RecordReader<'_>,
    base: ElementBase,
) -> Result<LinearElement, DecodeError> {
    Ok(LinearElement {
        base,
        points: reader.required("points", "array of [x, y] points")?,
        last_committed_point: reader.optional("lastCommittedPoint", "[x, y] point")?,
        start_binding: reader.optional("startBinding", "point binding object")?,
        end_binding: reader.optional("endBinding", "point binding object")?,
        start_arrowhead: reader.optional("startArrowhead", "arrowhead name")?,
        end_arrowhead: reader.optional("endArrowhead", "arrowhead name")?,
    })
}

fn encode_linear(writer: &mut RecordWriter, linear: &LinearElement) {
    writer.put("points", points_value(&linear.points));
    writer.put_opt("lastCommittedPoint", linear.last_committed_point.map(point_value));
    writer.put_opt(
        "startBinding",
        linear.start_binding.as_ref().map(|b| b.to_value()),
    );
    writer.put_opt("endBinding", linear.end_binding.as_ref().map(|b| b.to_value()));
    writer.put_opt("startArrowhead", linear.start_arrowhead.map(|a| a.as_str()));
    writer.put_opt("endArrowhead", linear.end_arrowhead.map(|a| a.as_str()));
}

fn decode_freedraw(
    reader: &mut RecordReader<'_>,
    base: ElementBase,
) -> Result<FreeDrawElement, DecodeError> {
    Ok(FreeDrawElement {
        base,
        points: reader.required("points", "array of [x, y] points")?,
        pressures: reader.required("pressures", "array of numbers")?,
        simulate_pressure: reader.required("simulatePressure", "boolean")?,
        last_committed_point: reader.optional("lastCommittedPoint", "[x, y] point")?,
    })
}

fn encode_freedraw(writer: &mut RecordWriter, freedraw: &FreeDrawElement) {
    writer.put("points", points_value(&freedraw.points));
    writer.put("pressures", freedraw.pressures.clone());
    writer.put("simulatePressure", freedraw.simulate_pressure);
    writer.put_opt(
        "lastCommittedPoint",
        freedraw.last_committed_point.map(point_value),
    );
}

fn decode_image(
    reader: &mut RecordReader<'_>,
    base: ElementBase,
) -> Result<ImageElement, DecodeError> {
    Ok(ImageElement {
        base,
        file_id: reader.optional("fileId", "file id string")?,
        status: reader.required("status", "one of \"pending\", \"saved\", \"error\"")?,
        scale: reader.required("scale", "[sx, sy] pair")?,
    })
}

fn encode_image(writer: &mut RecordWriter, image: &ImageElement) {
    writer.put_opt("fileId", image.file_id.clone());
    writer.put("status", image.status.as_str());
    writer.put("scale", point_value(image.scale));
}
