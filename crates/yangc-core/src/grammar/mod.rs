//! Statement grammar registry.
//!
//! Maps each keyword to the node kind it resolves to, its argument rule,
//! and the cardinality of every child keyword it accepts. The base table
//! is static and sorted for binary search; extension keywords discovered
//! from `extension` definitions during a session are layered on top.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// How many times a child keyword may appear under its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one occurrence.
    One,
    /// At most one occurrence.
    ZeroOrOne,
    /// Any number of occurrences, order preserved.
    ZeroOrMore,
}

/// Whether a statement takes an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentRule {
    /// The statement requires an argument.
    Required,
    /// The statement takes no argument (`input`, `output`).
    Forbidden,
}

/// The typed node a keyword resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Submodule,
    BelongsTo,
    Import,
    Include,
    Revision,
    Typedef,
    Type,
    Grouping,
    Uses,
    Container,
    Leaf,
    LeafList,
    List,
    ExtensionDef,
    ExtensionArgument,
    Rpc,
    RpcIo,
    /// Generic scalar statement (`prefix`, `namespace`, `description`, ...).
    Value,
}

/// Cardinality rule for one child keyword.
#[derive(Clone, Copy, Debug)]
pub struct ChildRule {
    /// The child keyword.
    pub keyword: &'static str,
    /// Allowed occurrence count.
    pub cardinality: Cardinality,
}

/// Grammar entry for one keyword.
#[derive(Clone, Copy, Debug)]
pub struct GrammarEntry {
    /// The statement keyword.
    pub keyword: &'static str,
    /// The node kind to construct.
    pub kind: NodeKind,
    /// Argument requirement.
    pub argument: ArgumentRule,
    /// Per-child-keyword cardinality rules.
    pub children: &'static [ChildRule],
}

impl GrammarEntry {
    /// Look up the cardinality rule for a child keyword.
    #[must_use]
    pub fn child_rule(&self, keyword: &str) -> Option<Cardinality> {
        self.children
            .iter()
            .find(|rule| rule.keyword == keyword)
            .map(|rule| rule.cardinality)
    }
}

const fn one(keyword: &'static str) -> ChildRule {
    ChildRule {
        keyword,
        cardinality: Cardinality::One,
    }
}

const fn opt(keyword: &'static str) -> ChildRule {
    ChildRule {
        keyword,
        cardinality: Cardinality::ZeroOrOne,
    }
}

const fn many(keyword: &'static str) -> ChildRule {
    ChildRule {
        keyword,
        cardinality: Cardinality::ZeroOrMore,
    }
}

/// `description` / `reference` tail shared by most statements.
static META: &[ChildRule] = &[opt("description"), opt("reference")];

static ENUM_CHILDREN: &[ChildRule] = &[
    opt("value"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static BIT_CHILDREN: &[ChildRule] = &[
    opt("position"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static TYPE_CHILDREN: &[ChildRule] = &[
    opt("range"),
    opt("length"),
    many("pattern"),
    opt("path"),
    many("enum"),
    many("bit"),
    opt("fraction-digits"),
];

static IMPORT_CHILDREN: &[ChildRule] = &[
    one("prefix"),
    opt("revision-date"),
    opt("description"),
    opt("reference"),
];

static INCLUDE_CHILDREN: &[ChildRule] = &[
    opt("revision-date"),
    opt("description"),
    opt("reference"),
];

static BELONGS_TO_CHILDREN: &[ChildRule] = &[one("prefix")];

static TYPEDEF_CHILDREN: &[ChildRule] = &[
    one("type"),
    opt("units"),
    opt("default"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static LEAF_CHILDREN: &[ChildRule] = &[
    one("type"),
    opt("units"),
    opt("default"),
    opt("config"),
    opt("mandatory"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static LEAF_LIST_CHILDREN: &[ChildRule] = &[
    one("type"),
    opt("units"),
    opt("config"),
    opt("min-elements"),
    opt("max-elements"),
    opt("ordered-by"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static LIST_CHILDREN: &[ChildRule] = &[
    opt("key"),
    opt("config"),
    opt("min-elements"),
    opt("max-elements"),
    opt("ordered-by"),
    opt("status"),
    opt("description"),
    opt("reference"),
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

static CONTAINER_CHILDREN: &[ChildRule] = &[
    opt("presence"),
    opt("config"),
    opt("status"),
    opt("description"),
    opt("reference"),
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

static GROUPING_CHILDREN: &[ChildRule] = &[
    opt("status"),
    opt("description"),
    opt("reference"),
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

static USES_CHILDREN: &[ChildRule] = &[opt("status"), opt("description"), opt("reference")];

static EXTENSION_CHILDREN: &[ChildRule] = &[
    opt("argument"),
    opt("status"),
    opt("description"),
    opt("reference"),
];

static ARGUMENT_CHILDREN: &[ChildRule] = &[opt("yin-element")];

static RPC_CHILDREN: &[ChildRule] = &[
    opt("input"),
    opt("output"),
    opt("status"),
    opt("description"),
    opt("reference"),
    many("typedef"),
    many("grouping"),
];

static RPC_IO_CHILDREN: &[ChildRule] = &[
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

static MODULE_CHILDREN: &[ChildRule] = &[
    one("namespace"),
    one("prefix"),
    opt("yang-version"),
    opt("organization"),
    opt("contact"),
    opt("description"),
    opt("reference"),
    many("import"),
    many("include"),
    many("revision"),
    many("extension"),
    many("rpc"),
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

static SUBMODULE_CHILDREN: &[ChildRule] = &[
    one("belongs-to"),
    opt("yang-version"),
    opt("organization"),
    opt("contact"),
    opt("description"),
    opt("reference"),
    many("import"),
    many("include"),
    many("revision"),
    many("extension"),
    many("rpc"),
    many("typedef"),
    many("grouping"),
    many("container"),
    many("leaf"),
    many("leaf-list"),
    many("list"),
    many("uses"),
];

const fn entry(
    keyword: &'static str,
    kind: NodeKind,
    argument: ArgumentRule,
    children: &'static [ChildRule],
) -> GrammarEntry {
    GrammarEntry {
        keyword,
        kind,
        argument,
        children,
    }
}

const NONE: &[ChildRule] = &[];

/// Sorted base grammar table for binary search.
///
/// IMPORTANT: This table MUST be sorted by keyword text. The test
/// `test_entries_sorted` verifies this at test time.
static ENTRIES: &[GrammarEntry] = &[
    entry("argument", NodeKind::ExtensionArgument, ArgumentRule::Required, ARGUMENT_CHILDREN),
    entry("belongs-to", NodeKind::BelongsTo, ArgumentRule::Required, BELONGS_TO_CHILDREN),
    entry("bit", NodeKind::Value, ArgumentRule::Required, BIT_CHILDREN),
    entry("config", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("contact", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("container", NodeKind::Container, ArgumentRule::Required, CONTAINER_CHILDREN),
    entry("default", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("description", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("enum", NodeKind::Value, ArgumentRule::Required, ENUM_CHILDREN),
    entry("extension", NodeKind::ExtensionDef, ArgumentRule::Required, EXTENSION_CHILDREN),
    entry("fraction-digits", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("grouping", NodeKind::Grouping, ArgumentRule::Required, GROUPING_CHILDREN),
    entry("import", NodeKind::Import, ArgumentRule::Required, IMPORT_CHILDREN),
    entry("include", NodeKind::Include, ArgumentRule::Required, INCLUDE_CHILDREN),
    entry("input", NodeKind::RpcIo, ArgumentRule::Forbidden, RPC_IO_CHILDREN),
    entry("key", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("leaf", NodeKind::Leaf, ArgumentRule::Required, LEAF_CHILDREN),
    entry("leaf-list", NodeKind::LeafList, ArgumentRule::Required, LEAF_LIST_CHILDREN),
    entry("length", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("list", NodeKind::List, ArgumentRule::Required, LIST_CHILDREN),
    entry("mandatory", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("max-elements", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("min-elements", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("module", NodeKind::Module, ArgumentRule::Required, MODULE_CHILDREN),
    entry("namespace", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("ordered-by", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("organization", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("output", NodeKind::RpcIo, ArgumentRule::Forbidden, RPC_IO_CHILDREN),
    entry("path", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("pattern", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("position", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("prefix", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("presence", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("range", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("reference", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("revision", NodeKind::Revision, ArgumentRule::Required, META),
    entry("revision-date", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("rpc", NodeKind::Rpc, ArgumentRule::Required, RPC_CHILDREN),
    entry("status", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("submodule", NodeKind::Submodule, ArgumentRule::Required, SUBMODULE_CHILDREN),
    entry("type", NodeKind::Type, ArgumentRule::Required, TYPE_CHILDREN),
    entry("typedef", NodeKind::Typedef, ArgumentRule::Required, TYPEDEF_CHILDREN),
    entry("units", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("uses", NodeKind::Uses, ArgumentRule::Required, USES_CHILDREN),
    entry("value", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("yang-version", NodeKind::Value, ArgumentRule::Required, NONE),
    entry("yin-element", NodeKind::Value, ArgumentRule::Required, NONE),
];

/// An extension keyword registered from an `extension` definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionSpec {
    /// The module that defines the extension.
    pub module: String,
    /// The extension keyword.
    pub keyword: String,
    /// Whether the extension declares an `argument`.
    pub takes_argument: bool,
}

/// Grammar registry: static base table plus a session extension overlay.
///
/// The base table is read-only and shared by all sessions; the overlay
/// collects extension keywords as their defining modules are resolved.
#[derive(Debug, Default)]
pub struct Grammar {
    /// Registered extensions, keyed by extension keyword.
    extensions: BTreeMap<String, ExtensionSpec>,
}

impl Grammar {
    /// Create a grammar with an empty extension overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a base keyword.
    #[must_use]
    pub fn lookup(&self, keyword: &str) -> Option<&'static GrammarEntry> {
        ENTRIES
            .binary_search_by(|entry| entry.keyword.cmp(keyword))
            .ok()
            .map(|idx| &ENTRIES[idx])
    }

    /// Look up a registered extension keyword.
    #[must_use]
    pub fn extension(&self, keyword: &str) -> Option<&ExtensionSpec> {
        self.extensions.get(keyword)
    }

    /// Register an extension keyword. Re-registering replaces the entry.
    pub fn register_extension(&mut self, spec: ExtensionSpec) {
        self.extensions.insert(spec.keyword.clone(), spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_sorted() {
        for window in ENTRIES.windows(2) {
            assert!(
                window[0].keyword < window[1].keyword,
                "grammar entries not sorted: {:?} should come before {:?}",
                window[0].keyword,
                window[1].keyword
            );
        }
    }

    #[test]
    fn test_lookup() {
        let grammar = Grammar::new();
        assert_eq!(grammar.lookup("module").map(|e| e.kind), Some(NodeKind::Module));
        assert_eq!(grammar.lookup("leaf-list").map(|e| e.kind), Some(NodeKind::LeafList));
        assert_eq!(grammar.lookup("prefix").map(|e| e.kind), Some(NodeKind::Value));
        assert!(grammar.lookup("no-such-keyword").is_none());
        assert!(grammar.lookup("").is_none());
    }

    #[test]
    fn test_child_rules() {
        let grammar = Grammar::new();
        let import = grammar.lookup("import").expect("entry");
        assert_eq!(import.child_rule("prefix"), Some(Cardinality::One));
        assert_eq!(import.child_rule("description"), Some(Cardinality::ZeroOrOne));
        assert_eq!(import.child_rule("namespace"), None);

        let module = grammar.lookup("module").expect("entry");
        assert_eq!(module.child_rule("import"), Some(Cardinality::ZeroOrMore));
        assert_eq!(module.child_rule("namespace"), Some(Cardinality::One));
    }

    #[test]
    fn test_argument_rules() {
        let grammar = Grammar::new();
        assert_eq!(
            grammar.lookup("input").map(|e| e.argument),
            Some(ArgumentRule::Forbidden)
        );
        assert_eq!(
            grammar.lookup("leaf").map(|e| e.argument),
            Some(ArgumentRule::Required)
        );
    }

    #[test]
    fn test_extension_overlay() {
        let mut grammar = Grammar::new();
        assert!(grammar.extension("annotation").is_none());

        grammar.register_extension(ExtensionSpec {
            module: "ietf-yang-metadata".into(),
            keyword: "annotation".into(),
            takes_argument: true,
        });

        let spec = grammar.extension("annotation").expect("registered");
        assert!(spec.takes_argument);
        assert_eq!(spec.module, "ietf-yang-metadata");

        // Base keywords are unaffected by the overlay.
        assert!(grammar.lookup("annotation").is_none());
        assert!(grammar.lookup("module").is_some());
    }
}
