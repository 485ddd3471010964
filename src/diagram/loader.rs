//! Diagram loading from JSON

use crate::analysis::Validator;
use crate::errors::{NsdError, NsdResult};

use super::ast::Root;

/// Parse and validate a diagram
pub fn load_diagram(source: &str) -> NsdResult<Root> {
    let root: Root = serde_json::from_str(source).map_err(|e| NsdError::from_json(&e, source))?;
    Validator::new().validate(&root)?;
    log::debug!(
        "loaded {} {:?} with {} top-level elements",
        if root.is_program { "program" } else { "subroutine" },
        root.method_name(),
        root.children.len()
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::ElementKind;

    #[test]
    fn test_load_nested_diagram() {
        let source = r#"{
            "name": "demo",
            "children": [
                { "kind": "instruction", "text": ["x <- 1"], "comment": ["start"] },
                { "kind": "alternative", "text": ["x > 0"],
                  "then_block": [ { "kind": "call", "text": ["f(x)"] } ] },
                { "kind": "for", "text": ["for i <- 1 to 3"],
                  "counter": "i", "start": "1", "end": "3", "step": "2",
                  "body": [ { "kind": "jump", "text": ["leave"] } ] }
            ]
        }"#;
        let root = load_diagram(source).unwrap();
        assert!(root.is_program);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children.elements[0].comment, ["start"]);
        match &root.children.elements[1].kind {
            ElementKind::Alternative {
                then_block,
                else_block,
            } => {
                assert_eq!(then_block.len(), 1);
                assert!(else_block.is_empty());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        match &root.children.elements[2].kind {
            ElementKind::For(for_loop) => {
                assert_eq!(for_loop.step_const(), 2);
                assert_eq!(for_loop.body.len(), 1);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_subroutine_metadata() {
        let source = r#"{
            "is_program": false,
            "name": "max",
            "parameters": [ { "name": "a", "type": "int" }, { "name": "b" } ],
            "result_type": "int"
        }"#;
        let root = load_diagram(source).unwrap();
        assert!(!root.is_program);
        assert_eq!(root.parameters[0].ty.as_deref(), Some("int"));
        assert_eq!(root.parameters[1].ty, None);
        assert_eq!(root.result_type.as_deref(), Some("int"));
    }

    #[test]
    fn test_syntax_error_has_span() {
        let source = "{\n  \"name\": \"demo\",\n  \"children\": [ { \"kind\": \"loop\" } ]\n}";
        let err = load_diagram(source).unwrap_err();
        assert!(matches!(err, NsdError::Json { .. }));
        assert!(err.span().is_some());
    }

    #[test]
    fn test_invalid_case_rejected() {
        let source = r#"{
            "children": [
                { "kind": "case", "text": ["x", "1"], "branches": [ [], [] ] }
            ]
        }"#;
        let err = load_diagram(source).unwrap_err();
        assert!(matches!(err, NsdError::InvalidDiagram { .. }));
    }
}
