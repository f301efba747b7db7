//! Statement-to-node resolution.
//!
//! Resolution is pure: it walks one statement tree against a [`Grammar`]
//! and either produces a typed [`Node`] or fails on the first violation.
//! Argument-shape violations surface as [`Error::Syntax`]; unknown
//! keywords and cardinality violations as [`Error::Resolution`].
//!
//! Prefixed statements are never an error here. A registered extension
//! keyword gets its argument checked against its definition; anything
//! else prefixed passes through as [`Node::Unknown`].

use crate::ast::Statement;
use crate::error::Error;
use crate::grammar::{ArgumentRule, Cardinality, Grammar, GrammarEntry, NodeKind};
use crate::node::{
    BelongsTo, Container, ExtensionArgument, ExtensionDef, Grouping, Import, Include, Leaf,
    LeafList, List, Module, Node, Revision, Rpc, RpcIo, Type, Typedef, Unknown, Uses, Value,
};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Resolve one statement tree into a typed node.
pub fn resolve(stmt: &Statement, grammar: &Grammar, source_name: &str) -> Result<Node, Error> {
    Resolver {
        grammar,
        source_name,
    }
    .resolve_stmt(stmt)
}

struct Resolver<'a> {
    grammar: &'a Grammar,
    source_name: &'a str,
}

impl Resolver<'_> {
    fn resolve_stmt(&self, stmt: &Statement) -> Result<Node, Error> {
        if stmt.prefix.is_some() {
            return self.resolve_prefixed(stmt);
        }

        let entry = self.grammar.lookup(&stmt.keyword).ok_or_else(|| {
            self.err(stmt, "unknown keyword".to_string())
        })?;

        self.check_argument(stmt, entry)?;
        self.check_children(stmt, entry)?;

        // Prefixed children are not interpreted, but registered extension
        // keywords still get their argument rule enforced at any depth.
        let mut children = Vec::new();
        for child in &stmt.children {
            if child.prefix.is_some() {
                self.resolve_prefixed(child)?;
            } else {
                children.push(self.resolve_stmt(child)?);
            }
        }

        self.build(entry.kind, stmt, children)
    }

    /// Resolve a `prefix:keyword` statement.
    ///
    /// Registered extensions get their argument checked; unregistered
    /// ones pass through untouched. Either way the children are not
    /// interpreted.
    fn resolve_prefixed(&self, stmt: &Statement) -> Result<Node, Error> {
        if let Some(spec) = self.grammar.extension(&stmt.keyword) {
            if spec.takes_argument && stmt.argument.is_none() {
                return Err(self.err(
                    stmt,
                    format!("extension '{}' requires an argument", stmt.full_keyword()),
                ));
            }
            if !spec.takes_argument && stmt.argument.is_some() {
                return Err(self.err(
                    stmt,
                    format!("extension '{}' takes no argument", stmt.full_keyword()),
                ));
            }
        }
        Ok(Node::Unknown(Unknown { stmt: stmt.clone() }))
    }

    fn check_argument(&self, stmt: &Statement, entry: &GrammarEntry) -> Result<(), Error> {
        match entry.argument {
            ArgumentRule::Required if stmt.argument.is_none() => Err(Error::Syntax {
                source_name: self.source_name.to_string(),
                loc: stmt.loc,
                message: format!("'{}' requires an argument", stmt.keyword),
            }),
            ArgumentRule::Forbidden if stmt.argument.is_some() => Err(Error::Syntax {
                source_name: self.source_name.to_string(),
                loc: stmt.loc,
                message: format!("'{}' takes no argument", stmt.keyword),
            }),
            _ => Ok(()),
        }
    }

    /// Enforce the parent's per-child-keyword cardinality rules.
    ///
    /// Prefixed children are exempt; they are extension territory.
    fn check_children(&self, stmt: &Statement, entry: &GrammarEntry) -> Result<(), Error> {
        for child in stmt.children.iter().filter(|c| c.prefix.is_none()) {
            if entry.child_rule(&child.keyword).is_none() {
                let message = if self.grammar.lookup(&child.keyword).is_none() {
                    "unknown keyword".to_string()
                } else {
                    format!("not allowed under '{}'", stmt.keyword)
                };
                return Err(self.err(child, message));
            }
        }

        for rule in entry.children {
            let mut named = stmt.children_named(rule.keyword);
            let first = named.next();
            let second = named.next();
            match rule.cardinality {
                Cardinality::One if first.is_none() => {
                    return Err(self.err(
                        stmt,
                        format!("missing required '{}' substatement", rule.keyword),
                    ));
                }
                Cardinality::One | Cardinality::ZeroOrOne => {
                    if let Some(dup) = second {
                        return Err(self.err(dup, "duplicate statement".to_string()));
                    }
                }
                Cardinality::ZeroOrMore => {}
            }
        }
        Ok(())
    }

    fn err(&self, stmt: &Statement, message: String) -> Error {
        Error::Resolution {
            source_name: self.source_name.to_string(),
            keyword: stmt.full_keyword(),
            argument: stmt.argument.clone(),
            loc: stmt.loc,
            message,
        }
    }

    /// The statement argument, which argument checking has established.
    fn name(&self, stmt: &Statement) -> Result<String, Error> {
        stmt.argument
            .clone()
            .ok_or_else(|| self.err(stmt, "missing argument".to_string()))
    }

    /// Prefixed children, kept uninterpreted in source order.
    fn unknown_children(stmt: &Statement) -> Vec<Statement> {
        stmt.children
            .iter()
            .filter(|c| c.prefix.is_some())
            .cloned()
            .collect()
    }

    // === Typed builders ===

    fn build(
        &self,
        kind: NodeKind,
        stmt: &Statement,
        children: Vec<Node>,
    ) -> Result<Node, Error> {
        match kind {
            NodeKind::Module => self.build_module(stmt, children, false),
            NodeKind::Submodule => self.build_module(stmt, children, true),
            NodeKind::Import => self.build_import(stmt, children),
            NodeKind::Include => self.build_include(stmt, children),
            NodeKind::BelongsTo => self.build_belongs_to(stmt, children),
            NodeKind::Revision => self.build_revision(stmt, children),
            NodeKind::Typedef => self.build_typedef(stmt, children),
            NodeKind::Type => self.build_type(stmt, children).map(Node::Type),
            NodeKind::Grouping => self.build_grouping(stmt, children),
            NodeKind::Uses => self.build_uses(stmt, children),
            NodeKind::Container => self.build_container(stmt, children),
            NodeKind::Leaf => self.build_leaf(stmt, children),
            NodeKind::LeafList => self.build_leaf_list(stmt, children),
            NodeKind::List => self.build_list(stmt, children),
            NodeKind::ExtensionDef => self.build_extension_def(stmt, children),
            NodeKind::ExtensionArgument => self.build_extension_argument(stmt, children),
            NodeKind::Rpc => self.build_rpc(stmt, children),
            NodeKind::RpcIo => self.build_rpc_io(stmt, children).map(Node::RpcIo),
            NodeKind::Value => Ok(Node::Value(Value { stmt: stmt.clone() })),
        }
    }

    fn build_module(
        &self,
        stmt: &Statement,
        children: Vec<Node>,
        is_submodule: bool,
    ) -> Result<Node, Error> {
        let mut module = Module {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            is_submodule,
            namespace: None,
            prefix: None,
            belongs_to: None,
            yang_version: None,
            organization: None,
            contact: None,
            description: None,
            reference: None,
            imports: Vec::new(),
            includes: Vec::new(),
            revisions: Vec::new(),
            extensions: Vec::new(),
            rpcs: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            body: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "namespace" => module.namespace = Some(v),
                    "prefix" => module.prefix = Some(v),
                    "yang-version" => module.yang_version = Some(v),
                    "organization" => module.organization = Some(v),
                    "contact" => module.contact = Some(v),
                    "description" => module.description = Some(v),
                    "reference" => module.reference = Some(v),
                    _ => {}
                },
                Node::BelongsTo(b) => module.belongs_to = Some(b),
                Node::Import(i) => module.imports.push(i),
                Node::Include(i) => module.includes.push(i),
                Node::Revision(r) => module.revisions.push(r),
                Node::ExtensionDef(e) => module.extensions.push(e),
                Node::Rpc(r) => module.rpcs.push(r),
                Node::Typedef(t) => module.typedefs.push(t),
                Node::Grouping(g) => module.groupings.push(g),
                other => module.body.push(other),
            }
        }

        Ok(Node::Module(module))
    }

    fn build_import(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut prefix = None;
        let mut revision_date = None;
        let mut description = None;
        let mut reference = None;

        for child in children {
            if let Node::Value(v) = child {
                match v.stmt.keyword.as_str() {
                    "prefix" => prefix = Some(v),
                    "revision-date" => revision_date = Some(v),
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                }
            }
        }

        Ok(Node::Import(Import {
            stmt: stmt.clone(),
            module: self.name(stmt)?,
            prefix: prefix
                .ok_or_else(|| self.err(stmt, "missing required 'prefix' substatement".into()))?,
            revision_date,
            description,
            reference,
        }))
    }

    fn build_include(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut revision_date = None;
        let mut description = None;
        let mut reference = None;

        for child in children {
            if let Node::Value(v) = child {
                match v.stmt.keyword.as_str() {
                    "revision-date" => revision_date = Some(v),
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                }
            }
        }

        Ok(Node::Include(Include {
            stmt: stmt.clone(),
            module: self.name(stmt)?,
            revision_date,
            description,
            reference,
        }))
    }

    fn build_belongs_to(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut prefix = None;
        for child in children {
            if let Node::Value(v) = child {
                if v.stmt.keyword == "prefix" {
                    prefix = Some(v);
                }
            }
        }

        Ok(Node::BelongsTo(BelongsTo {
            stmt: stmt.clone(),
            module: self.name(stmt)?,
            prefix: prefix
                .ok_or_else(|| self.err(stmt, "missing required 'prefix' substatement".into()))?,
        }))
    }

    fn build_revision(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut description = None;
        let mut reference = None;
        for child in children {
            if let Node::Value(v) = child {
                match v.stmt.keyword.as_str() {
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                }
            }
        }

        Ok(Node::Revision(Revision {
            stmt: stmt.clone(),
            date: self.name(stmt)?,
            description,
            reference,
        }))
    }

    fn build_typedef(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut ty = None;
        let mut units = None;
        let mut default = None;
        let mut status = None;
        let mut description = None;
        let mut reference = None;

        for child in children {
            match child {
                Node::Type(t) => ty = Some(t),
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "units" => units = Some(v),
                    "default" => default = Some(v),
                    "status" => status = Some(v),
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Node::Typedef(Typedef {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            ty: ty.ok_or_else(|| self.err(stmt, "missing required 'type' substatement".into()))?,
            units,
            default,
            status,
            description,
            reference,
        }))
    }

    fn build_type(&self, stmt: &Statement, children: Vec<Node>) -> Result<Type, Error> {
        let mut ty = Type {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            range: None,
            length: None,
            patterns: Vec::new(),
            path: None,
            enums: Vec::new(),
            bits: Vec::new(),
            fraction_digits: None,
        };

        for child in children {
            if let Node::Value(v) = child {
                match v.stmt.keyword.as_str() {
                    "range" => ty.range = Some(v),
                    "length" => ty.length = Some(v),
                    "pattern" => ty.patterns.push(v),
                    "path" => ty.path = Some(v),
                    "enum" => ty.enums.push(v),
                    "bit" => ty.bits.push(v),
                    "fraction-digits" => ty.fraction_digits = Some(v),
                    _ => {}
                }
            }
        }

        Ok(ty)
    }

    fn build_grouping(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut grouping = Grouping {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            status: None,
            description: None,
            reference: None,
            typedefs: Vec::new(),
            groupings: Vec::new(),
            body: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "status" => grouping.status = Some(v),
                    "description" => grouping.description = Some(v),
                    "reference" => grouping.reference = Some(v),
                    _ => {}
                },
                Node::Typedef(t) => grouping.typedefs.push(t),
                Node::Grouping(g) => grouping.groupings.push(g),
                other => grouping.body.push(other),
            }
        }

        Ok(Node::Grouping(grouping))
    }

    fn build_uses(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut uses = Uses {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            status: None,
            description: None,
            reference: None,
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            if let Node::Value(v) = child {
                match v.stmt.keyword.as_str() {
                    "status" => uses.status = Some(v),
                    "description" => uses.description = Some(v),
                    "reference" => uses.reference = Some(v),
                    _ => {}
                }
            }
        }

        Ok(Node::Uses(uses))
    }

    fn build_container(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut container = Container {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            presence: None,
            config: None,
            status: None,
            description: None,
            reference: None,
            typedefs: Vec::new(),
            groupings: Vec::new(),
            body: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "presence" => container.presence = Some(v),
                    "config" => container.config = Some(v),
                    "status" => container.status = Some(v),
                    "description" => container.description = Some(v),
                    "reference" => container.reference = Some(v),
                    _ => {}
                },
                Node::Typedef(t) => container.typedefs.push(t),
                Node::Grouping(g) => container.groupings.push(g),
                other => container.body.push(other),
            }
        }

        Ok(Node::Container(container))
    }

    fn build_leaf(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut ty = None;
        let mut units = None;
        let mut default = None;
        let mut config = None;
        let mut mandatory = None;
        let mut status = None;
        let mut description = None;
        let mut reference = None;

        for child in children {
            match child {
                Node::Type(t) => ty = Some(t),
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "units" => units = Some(v),
                    "default" => default = Some(v),
                    "config" => config = Some(v),
                    "mandatory" => mandatory = Some(v),
                    "status" => status = Some(v),
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Node::Leaf(Leaf {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            ty: ty.ok_or_else(|| self.err(stmt, "missing required 'type' substatement".into()))?,
            units,
            default,
            config,
            mandatory,
            status,
            description,
            reference,
            unknown: Self::unknown_children(stmt),
        }))
    }

    fn build_leaf_list(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut ty = None;
        let mut units = None;
        let mut config = None;
        let mut min_elements = None;
        let mut max_elements = None;
        let mut ordered_by = None;
        let mut status = None;
        let mut description = None;
        let mut reference = None;

        for child in children {
            match child {
                Node::Type(t) => ty = Some(t),
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "units" => units = Some(v),
                    "config" => config = Some(v),
                    "min-elements" => min_elements = Some(v),
                    "max-elements" => max_elements = Some(v),
                    "ordered-by" => ordered_by = Some(v),
                    "status" => status = Some(v),
                    "description" => description = Some(v),
                    "reference" => reference = Some(v),
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Node::LeafList(LeafList {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            ty: ty.ok_or_else(|| self.err(stmt, "missing required 'type' substatement".into()))?,
            units,
            config,
            min_elements,
            max_elements,
            ordered_by,
            status,
            description,
            reference,
            unknown: Self::unknown_children(stmt),
        }))
    }

    fn build_list(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut list = List {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            key: None,
            config: None,
            min_elements: None,
            max_elements: None,
            ordered_by: None,
            status: None,
            description: None,
            reference: None,
            typedefs: Vec::new(),
            groupings: Vec::new(),
            body: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "key" => list.key = Some(v),
                    "config" => list.config = Some(v),
                    "min-elements" => list.min_elements = Some(v),
                    "max-elements" => list.max_elements = Some(v),
                    "ordered-by" => list.ordered_by = Some(v),
                    "status" => list.status = Some(v),
                    "description" => list.description = Some(v),
                    "reference" => list.reference = Some(v),
                    _ => {}
                },
                Node::Typedef(t) => list.typedefs.push(t),
                Node::Grouping(g) => list.groupings.push(g),
                other => list.body.push(other),
            }
        }

        Ok(Node::List(list))
    }

    fn build_extension_def(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut def = ExtensionDef {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            argument: None,
            status: None,
            description: None,
            reference: None,
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::ExtensionArgument(a) => def.argument = Some(a),
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "status" => def.status = Some(v),
                    "description" => def.description = Some(v),
                    "reference" => def.reference = Some(v),
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Node::ExtensionDef(def))
    }

    fn build_extension_argument(
        &self,
        stmt: &Statement,
        children: Vec<Node>,
    ) -> Result<Node, Error> {
        let mut yin_element = None;
        for child in children {
            if let Node::Value(v) = child {
                if v.stmt.keyword == "yin-element" {
                    yin_element = Some(v);
                }
            }
        }

        Ok(Node::ExtensionArgument(ExtensionArgument {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            yin_element,
        }))
    }

    fn build_rpc(&self, stmt: &Statement, children: Vec<Node>) -> Result<Node, Error> {
        let mut rpc = Rpc {
            stmt: stmt.clone(),
            name: self.name(stmt)?,
            input: None,
            output: None,
            status: None,
            description: None,
            reference: None,
            typedefs: Vec::new(),
            groupings: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::RpcIo(io) => {
                    if io.stmt.keyword == "input" {
                        rpc.input = Some(io);
                    } else {
                        rpc.output = Some(io);
                    }
                }
                Node::Value(v) => match v.stmt.keyword.as_str() {
                    "status" => rpc.status = Some(v),
                    "description" => rpc.description = Some(v),
                    "reference" => rpc.reference = Some(v),
                    _ => {}
                },
                Node::Typedef(t) => rpc.typedefs.push(t),
                Node::Grouping(g) => rpc.groupings.push(g),
                _ => {}
            }
        }

        Ok(Node::Rpc(rpc))
    }

    fn build_rpc_io(&self, stmt: &Statement, children: Vec<Node>) -> Result<RpcIo, Error> {
        let mut io = RpcIo {
            stmt: stmt.clone(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            body: Vec::new(),
            unknown: Self::unknown_children(stmt),
        };

        for child in children {
            match child {
                Node::Typedef(t) => io.typedefs.push(t),
                Node::Grouping(g) => io.groupings.push(g),
                other => io.body.push(other),
            }
        }

        Ok(io)
    }
}
