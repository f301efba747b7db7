//! Module summary utility.
//!
//! Usage: yang-parse <file> [search-dir...]
//!
//! Parses one YANG module, resolving imports and includes against the
//! file's directory plus any extra search directories, then prints the
//! module header and its data tree.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use yangc_core::node::{Module, Node, Value};
use yangc_core::Modules;
use yangc_std::files::SearchPaths;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [search-dir...]", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let source = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            process::exit(1);
        }
    };
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&args[1]);

    let mut paths = SearchPaths::new();
    if let Some(dir) = path.parent() {
        paths.add(dir);
    }
    for dir in &args[2..] {
        paths.add(dir);
    }

    let mut modules = Modules::new();
    paths.install(&mut modules);

    match modules.parse(&source, name) {
        Ok(module) => print_module(module),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn print_module(module: &Module) {
    let kind = if module.is_submodule {
        "submodule"
    } else {
        "module"
    };
    println!("{kind} {}", module.name);
    if let Some(prefix) = module.prefix_name() {
        println!("  prefix: {prefix}");
    }
    if let Some(ns) = module.namespace.as_ref().and_then(Value::arg) {
        println!("  namespace: {ns}");
    }
    for import in &module.imports {
        println!(
            "  import: {} (prefix {})",
            import.module,
            import.prefix.arg().unwrap_or("?")
        );
    }
    for include in &module.includes {
        println!("  include: {}", include.module);
    }
    if let Some(revision) = module.revisions.first() {
        println!("  revision: {}", revision.date);
    }

    for rpc in &module.rpcs {
        println!("  rpc {}", rpc.name);
    }
    for node in &module.body {
        print_node(node, 1);
    }
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {}",
        node.statement().keyword,
        node.argument().unwrap_or("")
    );
    let children: &[Node] = match node {
        Node::Container(c) => &c.body,
        Node::List(l) => &l.body,
        Node::Grouping(g) => &g.body,
        _ => &[],
    };
    for child in children {
        print_node(child, depth + 1);
    }
}
