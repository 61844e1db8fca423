/// Structural analysis over realistic modules.
use sift_analyze::analyze;
use sift_analyze::structure::line_count;

use crate::common::{fixture, generators};

#[test]
fn test_inventory_declarations() {
    let analysis = analyze(&fixture("inventory.py")).unwrap();

    let names: Vec<&str> = analysis.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["__init__", "add", "total", "_reset", "export", "restock"]);

    let add = &analysis.functions[1];
    assert_eq!(add.parameters, vec!["self", "name", "count"]);
    assert_eq!(add.scope.as_deref(), Some("Inventory"));
    assert_eq!(add.docstring.as_deref(), Some("Add stock for an item."));
    assert_eq!(add.complexity, 2);

    assert_eq!(analysis.classes.len(), 1);
    assert_eq!(
        analysis.classes[0].methods,
        vec!["__init__", "add", "total", "_reset"]
    );
    assert_eq!(analysis.imports, vec!["json", "collections.OrderedDict"]);
    assert_eq!(analysis.variables, vec!["DEFAULT_STOCK", "inv"]);
    assert_eq!(analysis.testable_units(), 6);
}

#[test]
fn test_inventory_issues_and_complexity() {
    let analysis = analyze(&fixture("inventory.py")).unwrap();
    assert_eq!(
        analysis.issues,
        vec![
            "Missing docstring for __init__",
            "Missing docstring for _reset",
            "Missing docstring for restock",
            "Function restock has too many arguments (7)",
        ]
    );
    let sum: u32 = analysis.functions.iter().map(|f| f.complexity).sum();
    assert_eq!(analysis.complexity, sum);
    assert_eq!(analysis.complexity, 9);
}

#[test]
fn test_single_function_example() {
    let analysis = analyze("def f(a): return a").unwrap();
    assert_eq!(analysis.functions.len(), 1);
    assert_eq!(analysis.functions[0].name, "f");
    assert_eq!(analysis.functions[0].parameters, vec!["a"]);
    assert_eq!(analysis.complexity, 1);
    assert_eq!(analysis.issues, vec!["Missing docstring for f"]);
}

#[test]
fn test_complexity_and_line_count_properties() {
    let samples = [
        String::new(),
        "x = 1".to_string(),
        "x = 1\n".to_string(),
        "\n\n".to_string(),
        fixture("inventory.py"),
        fixture("loops.py"),
        generators::generate_functions(25, 8),
        generators::generate_classes(5, 4),
    ];
    for source in &samples {
        let analysis = analyze(source).unwrap();
        assert!(analysis.complexity >= 1, "source {source:?}");
        assert_eq!(analysis.lines_of_code, line_count(source));
        assert_eq!(
            analysis.lines_of_code as usize,
            source.split('\n').count(),
            "source {source:?}"
        );
    }
}

#[test]
fn test_trailing_newline_rules() {
    assert_eq!(analyze("").unwrap().lines_of_code, 1);
    assert_eq!(analyze("x = 1").unwrap().lines_of_code, 1);
    assert_eq!(analyze("x = 1\n").unwrap().lines_of_code, 2);
    assert_eq!(analyze("x = 1\n\n").unwrap().lines_of_code, 3);
}

#[test]
fn test_generated_module_scales() {
    let source = generators::generate_functions(200, 6);
    let analysis = analyze(&source).unwrap();
    assert_eq!(analysis.functions.len(), 200);
    assert!(analysis.functions.iter().all(|f| f.complexity == 2));
    assert_eq!(analysis.complexity, 400);
    assert!(analysis.issues.is_empty());
}

#[test]
fn test_analysis_is_idempotent() {
    for source in [fixture("inventory.py"), fixture("insecure.py"), fixture("loops.py")] {
        let first = analyze(&source).unwrap();
        let second = analyze(&source).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_syntax_error_reports_position() {
    let err = analyze(&fixture("broken.py")).unwrap_err();
    assert_eq!(err.line, Some(5));
    assert!(err.column.is_some());
    assert!(err.message.starts_with("Syntax Error:"));
}

#[test]
fn test_pathological_nesting_is_rejected() {
    let err = analyze(&generators::generate_deep_nesting(10_000)).unwrap_err();
    assert!(err.message.starts_with("Syntax Error:"), "{}", err.message);
    assert_eq!(err.line, Some(2));

    let analysis = analyze(&generators::generate_deep_nesting(60)).unwrap();
    assert_eq!(analysis.functions.len(), 1);
}
