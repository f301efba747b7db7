//! Typed nodes.
//!
//! The node resolver turns generic [`Statement`] trees into the typed
//! structures in this module. Every node keeps the statement it was built
//! from, so callers can always get back to the raw keyword, argument, and
//! location. Prefixed statements that the grammar does not know are kept
//! as [`Node::Unknown`] rather than dropped.

pub mod resolve;

use crate::ast::Statement;
use alloc::string::String;
use alloc::vec::Vec;

/// A resolved, typed YANG node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Module(Module),
    Import(Import),
    Include(Include),
    BelongsTo(BelongsTo),
    Revision(Revision),
    Typedef(Typedef),
    Type(Type),
    Grouping(Grouping),
    Uses(Uses),
    Container(Container),
    Leaf(Leaf),
    LeafList(LeafList),
    List(List),
    ExtensionDef(ExtensionDef),
    ExtensionArgument(ExtensionArgument),
    Rpc(Rpc),
    RpcIo(RpcIo),
    Value(Value),
    /// A prefixed extension usage passed through without interpretation.
    Unknown(Unknown),
}

impl Node {
    /// The statement this node was resolved from.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        match self {
            Node::Module(n) => &n.stmt,
            Node::Import(n) => &n.stmt,
            Node::Include(n) => &n.stmt,
            Node::BelongsTo(n) => &n.stmt,
            Node::Revision(n) => &n.stmt,
            Node::Typedef(n) => &n.stmt,
            Node::Type(n) => &n.stmt,
            Node::Grouping(n) => &n.stmt,
            Node::Uses(n) => &n.stmt,
            Node::Container(n) => &n.stmt,
            Node::Leaf(n) => &n.stmt,
            Node::LeafList(n) => &n.stmt,
            Node::List(n) => &n.stmt,
            Node::ExtensionDef(n) => &n.stmt,
            Node::ExtensionArgument(n) => &n.stmt,
            Node::Rpc(n) => &n.stmt,
            Node::RpcIo(n) => &n.stmt,
            Node::Value(n) => &n.stmt,
            Node::Unknown(n) => &n.stmt,
        }
    }

    /// The keyword as written in source, prefix included.
    #[must_use]
    pub fn keyword(&self) -> String {
        self.statement().full_keyword()
    }

    /// The statement argument, if any.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.statement().arg()
    }
}

/// A generic scalar statement (`prefix`, `namespace`, `description`, ...).
///
/// The argument carries the value; any substatements (as under `enum` or
/// `bit`) stay reachable through the kept statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    pub stmt: Statement,
}

impl Value {
    /// The statement this value was resolved from.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.stmt
    }

    /// The argument string, if any.
    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        self.stmt.arg()
    }
}

/// A prefixed statement the grammar does not interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unknown {
    pub stmt: Statement,
}

/// A `module` or `submodule` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub stmt: Statement,
    /// The module name (statement argument).
    pub name: String,
    /// True when this is a `submodule`.
    pub is_submodule: bool,
    pub namespace: Option<Value>,
    pub prefix: Option<Value>,
    /// Present on submodules only.
    pub belongs_to: Option<BelongsTo>,
    pub yang_version: Option<Value>,
    pub organization: Option<Value>,
    pub contact: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub imports: Vec<Import>,
    pub includes: Vec<Include>,
    pub revisions: Vec<Revision>,
    pub extensions: Vec<ExtensionDef>,
    pub rpcs: Vec<Rpc>,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    /// Data definitions (`container`, `leaf`, `leaf-list`, `list`,
    /// `uses`) in source order.
    pub body: Vec<Node>,
    /// Uninterpreted prefixed statements, in source order.
    pub unknown: Vec<Statement>,
}

impl Module {
    /// The prefix this module refers to itself by.
    ///
    /// For a module this is its `prefix` statement; for a submodule it is
    /// the prefix declared under `belongs-to`.
    #[must_use]
    pub fn prefix_name(&self) -> Option<&str> {
        if self.is_submodule {
            self.belongs_to.as_ref().and_then(|b| b.prefix.arg())
        } else {
            self.prefix.as_ref().and_then(Value::arg)
        }
    }
}

/// An `import` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub stmt: Statement,
    /// Name of the imported module (statement argument).
    pub module: String,
    /// Local prefix bound to the imported module.
    pub prefix: Value,
    pub revision_date: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
}

/// An `include` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub stmt: Statement,
    /// Name of the included submodule (statement argument).
    pub module: String,
    pub revision_date: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
}

/// A `belongs-to` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BelongsTo {
    pub stmt: Statement,
    /// Name of the owning module (statement argument).
    pub module: String,
    pub prefix: Value,
}

/// A `revision` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    pub stmt: Statement,
    /// The revision date (statement argument).
    pub date: String,
    pub description: Option<Value>,
    pub reference: Option<Value>,
}

/// A `typedef` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typedef {
    pub stmt: Statement,
    pub name: String,
    pub ty: Type,
    pub units: Option<Value>,
    pub default: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
}

/// A `type` statement.
///
/// The type name may be prefixed (`inet:ip-address`); resolution of the
/// reference itself is outside the front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub stmt: Statement,
    pub name: String,
    pub range: Option<Value>,
    pub length: Option<Value>,
    pub patterns: Vec<Value>,
    pub path: Option<Value>,
    pub enums: Vec<Value>,
    pub bits: Vec<Value>,
    pub fraction_digits: Option<Value>,
}

/// A `grouping` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    pub stmt: Statement,
    pub name: String,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    pub body: Vec<Node>,
    pub unknown: Vec<Statement>,
}

/// A `uses` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uses {
    pub stmt: Statement,
    /// Name of the referenced grouping, possibly prefixed.
    pub name: String,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub unknown: Vec<Statement>,
}

/// A `container` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub stmt: Statement,
    pub name: String,
    pub presence: Option<Value>,
    pub config: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    pub body: Vec<Node>,
    pub unknown: Vec<Statement>,
}

/// A `leaf` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub stmt: Statement,
    pub name: String,
    pub ty: Type,
    pub units: Option<Value>,
    pub default: Option<Value>,
    pub config: Option<Value>,
    pub mandatory: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub unknown: Vec<Statement>,
}

/// A `leaf-list` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafList {
    pub stmt: Statement,
    pub name: String,
    pub ty: Type,
    pub units: Option<Value>,
    pub config: Option<Value>,
    pub min_elements: Option<Value>,
    pub max_elements: Option<Value>,
    pub ordered_by: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub unknown: Vec<Statement>,
}

/// A `list` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    pub stmt: Statement,
    pub name: String,
    pub key: Option<Value>,
    pub config: Option<Value>,
    pub min_elements: Option<Value>,
    pub max_elements: Option<Value>,
    pub ordered_by: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    pub body: Vec<Node>,
    pub unknown: Vec<Statement>,
}

/// An `extension` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionDef {
    pub stmt: Statement,
    pub name: String,
    pub argument: Option<ExtensionArgument>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub unknown: Vec<Statement>,
}

/// An `argument` statement under `extension`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionArgument {
    pub stmt: Statement,
    pub name: String,
    pub yin_element: Option<Value>,
}

/// An `rpc` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rpc {
    pub stmt: Statement,
    pub name: String,
    pub input: Option<RpcIo>,
    pub output: Option<RpcIo>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    pub reference: Option<Value>,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    pub unknown: Vec<Statement>,
}

/// An `input` or `output` block under `rpc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcIo {
    pub stmt: Statement,
    pub typedefs: Vec<Typedef>,
    pub groupings: Vec<Grouping>,
    pub body: Vec<Node>,
    pub unknown: Vec<Statement>,
}
