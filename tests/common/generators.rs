/// Python source generators for benchmarks and large-scale tests.
use std::fmt::Write;

/// Generate a module with `count` documented functions, each roughly
/// `lines_per_fn` lines long and containing one branch.
#[allow(dead_code)]
pub fn generate_functions(count: usize, lines_per_fn: usize) -> String {
    let mut source = String::new();
    let body_lines = lines_per_fn.saturating_sub(4);
    for i in 0..count {
        writeln!(source, "def func_{i}(arg: str) -> str:").unwrap();
        writeln!(source, "    \"\"\"Function number {i}.\"\"\"").unwrap();
        for j in 0..body_lines {
            writeln!(source, "    val_{j} = arg + \"{j}\"").unwrap();
        }
        writeln!(source, "    if arg:\n        return arg\n    return ''\n").unwrap();
    }
    source
}

/// Generate a module with `count` classes of `methods` public methods each.
#[allow(dead_code)]
pub fn generate_classes(count: usize, methods: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        writeln!(source, "class Service{i}:").unwrap();
        writeln!(source, "    \"\"\"Service number {i}.\"\"\"").unwrap();
        for m in 0..methods {
            writeln!(source, "    def handle_{m}(self, request):").unwrap();
            writeln!(source, "        return request\n").unwrap();
        }
    }
    source
}

/// Generate `count` functions, each with a loop nest `depth` levels deep
/// whose innermost body appends to a list.
#[allow(dead_code)]
pub fn generate_loop_nests(count: usize, depth: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        writeln!(source, "def nest_{i}(data):").unwrap();
        writeln!(source, "    out = []").unwrap();
        for d in 0..depth {
            let indent = "    ".repeat(d + 1);
            writeln!(source, "{indent}for x{d} in data:").unwrap();
        }
        let indent = "    ".repeat(depth + 1);
        writeln!(source, "{indent}out.append(x0)").unwrap();
        writeln!(source, "    return out\n").unwrap();
    }
    source
}

/// Generate a function whose return expression nests `depth` parentheses
/// and calls.
#[allow(dead_code)]
pub fn generate_deep_nesting(depth: usize) -> String {
    format!(
        "def deep(x):\n    return {}x{}\n",
        "len(".repeat(depth),
        ")".repeat(depth)
    )
}
