//! Oberon code generator
//!
//! Generates Oberon modules and exported procedures. `EXIT` only leaves the
//! innermost loop, so multi-level leaves go through synthesized flags.

use super::emitter::Emitter;
use super::framework::{map_operators, Backend, ForFacets, RoutineContext};
use super::syntax::{RepeatStyle, Syntax};

pub static OBERON_SYNTAX: Syntax = Syntax {
    title: "Oberon",
    description: "Oberon Source Code",
    extension: "Mod",

    indent_unit: "  ",
    comment_left: "(*",
    comment_right: "*)",

    input: "In.TYPE($1)",
    output: "Out.TYPE($1)",
    assignment: " := ",
    terminator: ";",

    if_head: &["IF {cond} THEN"],
    else_line: "ELSE",
    if_tail: "END;",

    case_head: "CASE {selector} OF",
    case_label: "{patterns}:",
    case_pattern_separator: ", ",
    case_branch_separator: Some("|"),
    case_branch_tail: None,
    case_default: "ELSE",
    case_tail: "END;",

    while_head: &["WHILE {cond} DO"],
    forever_head: &["LOOP"],
    loop_tail: "END;",
    repeat: RepeatStyle::Native,
    repeat_head: &["REPEAT"],
    repeat_tail: "UNTIL {cond};",

    break_line: "EXIT",
    supports_simple_break: false,
    break_levels: "EXIT",
    return_line: "RETURN {expr}",
    exit_line: "HALT({expr})",
    exit_default: "0",

    flag_init: "{flag} := FALSE;",
    flag_raise: "{flag} := TRUE;",
    flag_check: "IF {flag} THEN EXIT END;",
    flag_unset: "~{flag}",

    parallel_open: Some("BEGIN"),
    parallel_close: Some("END;"),
    thread_open: Some("BEGIN"),
    thread_close: Some("END;"),
};

/// Canonical operators and their Oberon spelling
const OPERATORS: &[(&str, &str)] = &[
    ("==", "="),
    ("!=", "#"),
    ("div", "DIV"),
    ("%", "MOD"),
    ("&&", "&"),
    ("||", "OR"),
    ("!", "~"),
];

/// Oberon's own type names, passed through unchanged
const NATIVE_TYPES: &[&str] = &[
    "BOOLEAN", "CHAR", "SHORTINT", "INTEGER", "LONGINT", "REAL", "LONGREAL", "SET", "BYTE",
];

const MISSING_TYPE: &str = "(*type?*)";

/// Oberon backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Oberon;

impl Oberon {
    /// Formal parameters, consecutive ones of equal type sharing it
    fn parameter_list(&self, routine: &RoutineContext) -> String {
        let mut groups: Vec<(Vec<&str>, String)> = Vec::new();

        for parameter in &routine.root.parameters {
            let ty = self.map_type(parameter.ty.as_deref());
            match groups.last_mut() {
                Some((names, last)) if *last == ty && ty != MISSING_TYPE => {
                    names.push(parameter.name.trim())
                }
                _ => groups.push((vec![parameter.name.trim()], ty)),
            }
        }

        groups
            .iter()
            .map(|(names, ty)| format!("{}: {}", names.join(", "), ty))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Backend for Oberon {
    fn syntax(&self) -> &Syntax {
        &OBERON_SYNTAX
    }

    fn map_type(&self, ty: Option<&str>) -> String {
        let Some(ty) = ty.map(str::trim).filter(|t| !t.is_empty()) else {
            return MISSING_TYPE.to_string();
        };
        let mapped = match ty.to_ascii_lowercase().as_str() {
            "long" | "unsigned long" => "LONGINT",
            "int" | "integer" | "unsigned" | "unsigned int" => "INTEGER",
            "short" | "unsigned short" | "unsigned char" => "SHORTINT",
            "char" | "character" => "CHAR",
            "float" | "single" | "real" => "REAL",
            "double" | "longreal" => "LONGREAL",
            "bool" | "boolean" => "BOOLEAN",
            "string" => "ARRAY 100 OF CHAR",
            _ if NATIVE_TYPES.contains(&ty) => ty,
            _ => {
                log::warn!("no Oberon type for {:?}", ty);
                return format!("{} (*TODO: type?*)", ty);
            }
        };
        mapped.to_string()
    }

    fn transform_line(&self, line: String) -> String {
        map_operators(&line, OPERATORS)
    }

    fn for_head(&self, facets: &ForFacets) -> Vec<String> {
        let step = match facets.step {
            1 => String::new(),
            step => format!(" BY {}", step),
        };
        vec![format!(
            "FOR {} := {} TO {}{} DO",
            facets.counter, facets.start, facets.end, step
        )]
    }

    fn emit_input(&self, out: &mut Emitter, indent: &str, target: &str) {
        out.line(indent, "In.Open;");
        if target.is_empty() {
            out.line(indent, "In.Char(dummyInputChar);");
        } else {
            out.comment(indent, "TODO: Replace \"TYPE\" by the actual data type name!");
            out.line(indent, &format!("In.TYPE({});", target));
        }
    }

    fn emit_output(&self, out: &mut Emitter, indent: &str, values: &[String]) {
        out.comment(
            indent,
            "TODO: Replace \"TYPE\" by the actual data type name and add a length argument where needed!",
        );
        for value in values {
            out.line(indent, &format!("Out.TYPE({});", value));
        }
        out.line(indent, "Out.Ln;");
    }

    fn header(&self, out: &mut Emitter, routine: &RoutineContext) -> String {
        let root = routine.root;
        let name = root.method_name();

        if root.is_program {
            out.line("", &format!("MODULE {};", name));
        } else {
            let yields = routine.info.yields_value(root);
            let parameters = self.parameter_list(routine);
            let mut header = format!("PROCEDURE {}*", name);
            if !parameters.is_empty() || yields {
                header.push_str(&format!("({})", parameters));
            }
            if yields {
                header.push_str(": ");
                header.push_str(&self.map_type(root.result_type.as_deref()));
            }
            header.push(';');
            out.line("", &header);
        }

        if routine.options.export_comments {
            out.block_comment("", &root.comment);
        }
        String::new()
    }

    fn preamble(&self, out: &mut Emitter, routine: &RoutineContext, indent: &str) -> String {
        let inner = format!("{}{}", indent, OBERON_SYNTAX.indent_unit);
        let root = routine.root;

        out.line(indent, "VAR");
        out.comment(&inner, "TODO: Declare and initialise local variables here:");
        out.line(&inner, "dummyInputChar: CHAR; (* for void input *)");
        for flag in routine.flags {
            out.line(&inner, &format!("{}: BOOLEAN;", flag));
        }
        for variable in &routine.info.variables {
            if !root.parameters.iter().any(|p| p.name.trim() == variable) {
                out.comment(&inner, variable);
            }
        }
        out.line(indent, "BEGIN");
        inner
    }

    fn result(&self, out: &mut Emitter, routine: &RoutineContext, indent: &str) {
        let root = routine.root;
        let info = routine.info;
        if root.is_program || !info.yields_value(root) || info.always_returns {
            return;
        }

        let result = if info.function_name_set {
            root.method_name().to_string()
        } else if info.result_set {
            info.variables
                .iter()
                .find(|v| v.eq_ignore_ascii_case("result"))
                .cloned()
                .unwrap_or_else(|| "result".to_string())
        } else {
            "0".to_string()
        };
        out.blank();
        out.line(indent, &format!("RETURN {};", result));
    }

    fn footer(&self, out: &mut Emitter, routine: &RoutineContext) {
        let root = routine.root;
        let close = if root.is_program { '.' } else { ';' };
        out.line("", &format!("END {}{}", root.method_name(), close));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::framework::Generator;
    use crate::config::GeneratorConfig;
    use crate::diagram::{Block, Element, ElementKind, ForLoop, Parameter, Root};

    fn generator() -> Generator<Oberon> {
        Generator::new(Oberon, GeneratorConfig::default())
    }

    fn render(elements: Vec<Element>) -> Vec<String> {
        generator().render_block(&Block::new(elements), "")
    }

    #[test]
    fn test_operator_spelling() {
        let generator = generator();
        assert_eq!(generator.transform("a <> b and not c"), "a # b & ~ c");
        assert_eq!(generator.transform("q := n div 2 mod 3"), "q := n DIV 2 MOD 3");
        assert_eq!(generator.transform("x = 1 or y == 2"), "x = 1 OR y = 2");
    }

    #[test]
    fn test_alternative_with_else() {
        let alternative = Element::new(
            ElementKind::Alternative {
                then_block: Block::new(vec![Element::instruction(&["y <- 1"])]),
                else_block: Block::new(vec![Element::instruction(&["y <- 2"])]),
            },
            &["x > 0"],
        );
        assert_eq!(
            render(vec![alternative]),
            ["IF x > 0 THEN", "  y := 1;", "ELSE", "  y := 2;", "END;"]
        );
    }

    #[test]
    fn test_case() {
        let case = Element::new(
            ElementKind::Case {
                branches: vec![
                    Block::new(vec![Element::instruction(&["x <- 1"])]),
                    Block::new(vec![Element::instruction(&["x <- 2"])]),
                    Block::new(vec![Element::instruction(&["x <- 3"])]),
                ],
            },
            &["n", "1,2", "3", "otherwise"],
        );
        assert_eq!(
            render(vec![case]),
            [
                "CASE n OF",
                "  1, 2:",
                "    x := 1;",
                "|",
                "  3:",
                "    x := 2;",
                "  ELSE",
                "    x := 3;",
                "END;",
            ]
        );
    }

    #[test]
    fn test_repeat_is_native() {
        let repeat = Element::new(
            ElementKind::Repeat {
                body: Block::new(vec![Element::instruction(&["inc(x)"])]),
            },
            &["until x > 5"],
        );
        assert_eq!(
            render(vec![repeat]),
            ["REPEAT", "  x := x + 1;", "UNTIL x > 5;"]
        );
    }

    #[test]
    fn test_for_loop_missing_bound_passes_through() {
        let missing_start = ForLoop::new("i", "", "n", None, Block::default());
        let missing_end = ForLoop::new("k", "0", "", Some("2"), Block::default());
        assert_eq!(
            render(vec![
                Element::new(ElementKind::For(missing_start), &[]),
                Element::new(ElementKind::For(missing_end), &[]),
            ]),
            ["FOR i :=  TO n DO", "END;", "FOR k := 0 TO  BY 2 DO", "END;"]
        );
    }

    #[test]
    fn test_input_output() {
        assert_eq!(
            render(vec![Element::instruction(&["INPUT x", "INPUT", "OUTPUT a, b"])]),
            [
                "In.Open;",
                "(* TODO: Replace \"TYPE\" by the actual data type name! *)",
                "In.TYPE(x);",
                "In.Open;",
                "In.Char(dummyInputChar);",
                "(* TODO: Replace \"TYPE\" by the actual data type name and add a length argument where needed! *)",
                "Out.TYPE(a);",
                "Out.TYPE(b);",
                "Out.Ln;",
            ]
        );
    }

    #[test]
    fn test_jumps() {
        let jumps = Element::new(ElementKind::Jump, &["return", "exit", "exit 2", "stop()"]);
        assert_eq!(
            render(vec![jumps]),
            ["RETURN;", "HALT(0);", "HALT(2);", "stop();"]
        );
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(Oberon.map_type(Some("int")), "INTEGER");
        assert_eq!(Oberon.map_type(Some(" Double ")), "LONGREAL");
        assert_eq!(Oberon.map_type(Some("string")), "ARRAY 100 OF CHAR");
        assert_eq!(Oberon.map_type(Some("LONGINT")), "LONGINT");
        assert_eq!(Oberon.map_type(None), "(*type?*)");
        assert_eq!(Oberon.map_type(Some("Matrix")), "Matrix (*TODO: type?*)");
    }

    #[test]
    fn test_function_procedure() {
        let alternative = Element::new(
            ElementKind::Alternative {
                then_block: Block::new(vec![Element::instruction(&["max <- a"])]),
                else_block: Block::new(vec![Element::instruction(&["max <- b"])]),
            },
            &["a > b"],
        );
        let root = Root::subroutine(
            "max",
            vec![Parameter::new("a", Some("int")), Parameter::new("b", Some("int"))],
            Some("int"),
            Block::new(vec![alternative]),
        );
        let code = generator().render(&root).unwrap();
        let expected = [
            "PROCEDURE max*(a, b: INTEGER): INTEGER;",
            "VAR",
            "  (* TODO: Declare and initialise local variables here: *)",
            "  dummyInputChar: CHAR; (* for void input *)",
            "  (* max *)",
            "BEGIN",
            "  IF a > b THEN",
            "    max := a;",
            "  ELSE",
            "    max := b;",
            "  END;",
            "",
            "  RETURN max;",
            "END max;",
        ];
        assert_eq!(code, expected.join("\n") + "\n");
    }

    #[test]
    fn test_parameter_grouping() {
        let root = Root::subroutine(
            "p",
            vec![
                Parameter::new("a", Some("int")),
                Parameter::new("b", Some("int")),
                Parameter::new("c", Some("real")),
                Parameter::new("d", None),
                Parameter::new("e", None),
            ],
            None,
            Block::default(),
        );
        let code = generator().render(&root).unwrap();
        assert!(code.starts_with(
            "PROCEDURE p*(a, b: INTEGER; c: REAL; d: (*type?*); e: (*type?*));\n"
        ));
        assert!(code.ends_with("END p;\n"));
    }

    #[test]
    fn test_module_with_leave_flag() {
        let inner = Element::new(
            ElementKind::While {
                body: Block::new(vec![Element::new(ElementKind::Jump, &["leave 2"])]),
            },
            &["while x < 10"],
        );
        let outer = Element::new(
            ElementKind::Forever {
                body: Block::new(vec![inner]),
            },
            &[],
        );
        let mut root = Root::program("demo", Block::new(vec![outer]));
        root.comment = vec!["Leaves two loops".to_string()];
        let code = generator().render(&root).unwrap();
        let expected = [
            "MODULE demo;",
            "(*",
            " * Leaves two loops",
            " *)",
            "VAR",
            "  (* TODO: Declare and initialise local variables here: *)",
            "  dummyInputChar: CHAR; (* for void input *)",
            "  leaveFlag1: BOOLEAN;",
            "BEGIN",
            "  leaveFlag1 := FALSE;",
            "  LOOP",
            "    WHILE x < 10 DO",
            "      leaveFlag1 := TRUE;",
            "      EXIT;",
            "    END;",
            "    IF leaveFlag1 THEN EXIT END;",
            "  END;",
            "END demo.",
        ];
        assert_eq!(code, expected.join("\n") + "\n");
    }

    #[test]
    fn test_parallel_sections() {
        let parallel = Element::new(
            ElementKind::Parallel {
                threads: vec![
                    Block::new(vec![Element::instruction(&["a <- 1"])]),
                    Block::new(vec![Element::instruction(&["b <- 2"])]),
                ],
            },
            &[],
        );
        let lines = render(vec![parallel]);
        assert_eq!(lines[1], "(* ================= START PARALLEL SECTION ================= *)");
        assert!(lines.contains(&"  (* ----------------- START THREAD 1 ----------------- *)".to_string()));
        let first = lines.iter().position(|l| l == "    a := 1;").unwrap();
        let second = lines.iter().position(|l| l == "    b := 2;").unwrap();
        assert!(first < second);
        assert_eq!(lines[4], "BEGIN");
        assert_eq!(lines[lines.len() - 4], "END;");
    }
}
