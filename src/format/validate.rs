//! Reference checks over a decoded document.
//!
//! Decoding never enforces that ids referenced between elements exist; these
//! helpers report the ones that do not.

use std::collections::HashSet;

use crate::schema::Element;

/// A reference from one element to an id not present in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Element holding the reference.
    pub element_id: String,
    /// Record field the reference is stored in.
    pub field: &'static str,
    /// The missing id.
    pub target: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} references missing element '{}'",
            self.element_id, self.field, self.target
        )
    }
}

/// References (`frameId`, `containerId`, `boundElements`, bindings) whose
/// target id is not in `elements`. Deleted elements still count as targets.
pub fn dangling_references(elements: &[Element]) -> Vec<DanglingReference> {
    let ids: HashSet<&str> = elements.iter().map(Element::id).collect();
    let mut dangling = Vec::new();

    let mut check = |element: &Element, field: &'static str, target: &str| {
        if !ids.contains(target) {
            dangling.push(DanglingReference {
                element_id: element.id().to_string(),
                field,
                target: target.to_string(),
            });
        }
    };

    for element in elements {
        let base = element.base();
        if let Some(frame_id) = &base.frame_id {
            check(element, "frameId", frame_id);
        }
        for bound in base.bound_elements.iter().flatten() {
            check(element, "boundElements", &bound.id);
        }
        if let Some(container_id) = element.as_text().and_then(|t| t.container_id.as_deref()) {
            check(element, "containerId", container_id);
        }
        if let Some(linear) = element.as_linear() {
            if let Some(binding) = &linear.start_binding {
                check(element, "startBinding", &binding.element_id);
            }
            if let Some(binding) = &linear.end_binding {
                check(element, "endBinding", &binding.element_id);
            }
        }
    }

    dangling
}

/// Ids that occur on more than one element, in first-seen order.
pub fn duplicate_ids(elements: &[Element]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for element in elements {
        let id = element.id();
        if !seen.insert(id) && !duplicates.iter().any(|d| d == id) {
            duplicates.push(id.to_string());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        BoundElement, ElementBase, GenericElement, LinearElement, PointBinding, TextElement,
    };

    fn rect(id: &str) -> Element {
        Element::Rectangle(GenericElement::new(ElementBase::new(id)))
    }

    #[test]
    fn test_no_dangling_in_consistent_document() {
        let mut container = ElementBase::new("box");
        container.bound_elements = Some(vec![BoundElement::arrow("a1")]);

        let mut arrow = LinearElement::new(ElementBase::new("a1"), vec![[0.0, 0.0], [5.0, 5.0]]);
        arrow.start_binding = Some(PointBinding::new("box", 0.0, 2.0));

        let elements = vec![
            Element::Rectangle(GenericElement::new(container)),
            Element::Arrow(arrow),
            Element::Text(TextElement::new(ElementBase::new("t1"), "label").in_container("box")),
        ];

        assert!(dangling_references(&elements).is_empty());
    }

    #[test]
    fn test_reports_missing_targets() {
        let mut framed = ElementBase::new("r1");
        framed.frame_id = Some("gone-frame".to_string());

        let mut arrow = LinearElement::new(ElementBase::new("a1"), vec![[0.0, 0.0]]);
        arrow.end_binding = Some(PointBinding::new("gone-shape", 0.0, 1.0));

        let elements = vec![
            Element::Rectangle(GenericElement::new(framed)),
            Element::Arrow(arrow),
        ];

        let dangling = dangling_references(&elements);
        assert_eq!(dangling.len(), 2);
        assert_eq!(dangling[0].field, "frameId");
        assert_eq!(dangling[0].target, "gone-frame");
        assert_eq!(dangling[1].element_id, "a1");
        assert_eq!(
            dangling[1].to_string(),
            "a1.endBinding references missing element 'gone-shape'"
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let elements = vec![rect("a"), rect("b"), rect("a"), rect("a")];
        assert_eq!(duplicate_ids(&elements), vec!["a".to_string()]);
        assert!(duplicate_ids(&[rect("x")]).is_empty());
    }
}
