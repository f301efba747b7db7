//! Module registry and cross-module linking.
//!
//! [`Modules`] is the session context: it owns the grammar (including the
//! session extension overlay), the registered modules and submodules, the
//! prefix bindings, and an optional source provider used to load import
//! and include targets on demand.
//!
//! Registration is transactional per source: if linking a module fails,
//! the registry entry it would have replaced is restored. Re-parsing a
//! module under the same name replaces the earlier entry (last write
//! wins). Prefix bindings accumulate for the lifetime of the session.

pub mod tracing;

use crate::error::Error;
use crate::grammar::{ExtensionSpec, Grammar};
use crate::node::resolve::resolve;
use crate::node::{Module, Node};
use crate::parser::Parser;
use crate::registry::tracing::{NoopTracer, Phase, TraceEvent, TraceLevel, Tracer};
use crate::trace_event;
use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Callback that supplies source text for a module name.
///
/// Returning `None` means the module is unavailable; the requesting
/// import or include then fails.
pub type SourceProvider = Box<dyn FnMut(&str) -> Option<String>>;

/// The set of modules registered in one compilation session.
pub struct Modules {
    /// Grammar with the session extension overlay.
    grammar: Grammar,
    /// Registered modules, by declared name.
    modules: BTreeMap<String, Module>,
    /// Registered submodules, by declared name.
    submodules: BTreeMap<String, Module>,
    /// Prefix declared by a module for itself, mapped to the module name.
    own_prefixes: BTreeMap<String, String>,
    /// Prefixes bound by imports, mapped to the imported module name.
    import_bindings: BTreeMap<String, String>,
    /// Names currently being linked; breaks mutual-import cycles.
    in_progress: Vec<String>,
    /// On-demand loader for import and include targets.
    provider: Option<SourceProvider>,
    tracer: Box<dyn Tracer>,
}

impl Default for Modules {
    fn default() -> Self {
        Self::new()
    }
}

impl Modules {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            modules: BTreeMap::new(),
            submodules: BTreeMap::new(),
            own_prefixes: BTreeMap::new(),
            import_bindings: BTreeMap::new(),
            in_progress: Vec::new(),
            provider: None,
            tracer: Box::new(NoopTracer),
        }
    }

    /// Install a source provider for on-demand loading of import and
    /// include targets.
    pub fn set_source_provider<F>(&mut self, provider: F)
    where
        F: FnMut(&str) -> Option<String> + 'static,
    {
        self.provider = Some(Box::new(provider));
    }

    /// Install a tracer for registration diagnostics.
    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.tracer = tracer;
    }

    /// The session grammar, extension overlay included.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse source text and register the module or submodule it declares.
    ///
    /// `name` is the logical source name used in diagnostics; the registry
    /// key is the name the source itself declares. Imports and includes are
    /// linked immediately, loading targets through the source provider as
    /// needed. On failure nothing is registered.
    pub fn parse(&mut self, text: &str, name: &str) -> Result<&Module, Error> {
        let (declared, is_submodule) = self.parse_source(text, name)?;
        let map = if is_submodule {
            &self.submodules
        } else {
            &self.modules
        };
        map.get(&declared).ok_or_else(|| Error::NotFound {
            entity: if is_submodule { "submodule" } else { "module" },
            name: declared,
        })
    }

    /// Look up a registered module, loading it through the source provider
    /// if necessary.
    ///
    /// A name with no registered entry and no loadable source is a plain
    /// lookup miss, not an import failure.
    pub fn find_module(&mut self, name: &str) -> Result<&Module, Error> {
        // A name registered as a submodule is a miss here, not something
        // to re-fetch from the provider.
        if !self.modules.contains_key(name) && !self.submodules.contains_key(name) {
            self.load(name, name, false)?;
        }
        self.modules.get(name).ok_or_else(|| Error::NotFound {
            entity: "module",
            name: name.to_string(),
        })
    }

    /// Look up a registered submodule, loading it through the source
    /// provider if necessary.
    pub fn find_submodule(&mut self, name: &str) -> Result<&Module, Error> {
        if !self.submodules.contains_key(name) && !self.modules.contains_key(name) {
            self.load(name, name, true)?;
        }
        self.submodules.get(name).ok_or_else(|| Error::NotFound {
            entity: "submodule",
            name: name.to_string(),
        })
    }

    /// Look up a module by prefix.
    ///
    /// A prefix a module declares for itself wins over a prefix bound by
    /// some module's import of it.
    pub fn find_module_by_prefix(&self, prefix: &str) -> Result<&Module, Error> {
        let name = self
            .own_prefixes
            .get(prefix)
            .or_else(|| self.import_bindings.get(prefix))
            .ok_or_else(|| Error::NotFound {
                entity: "prefix",
                name: prefix.to_string(),
            })?;
        self.modules.get(name).ok_or_else(|| Error::NotFound {
            entity: "module",
            name: name.clone(),
        })
    }

    // === Internals ===

    /// Parse, resolve, register, and link one source text.
    ///
    /// Returns the declared name and whether it is a submodule.
    fn parse_source(&mut self, text: &str, name: &str) -> Result<(String, bool), Error> {
        trace_event!(
            self.tracer,
            TraceLevel::Debug,
            TraceEvent::PhaseStart {
                phase: Phase::Parse,
                module: name,
            }
        );
        let stmt = Parser::new(text, name)?.parse()?;
        trace_event!(
            self.tracer,
            TraceLevel::Debug,
            TraceEvent::PhaseStart {
                phase: Phase::Resolve,
                module: name,
            }
        );
        let node = resolve(&stmt, &self.grammar, name)?;
        let module = match node {
            Node::Module(module) => module,
            other => {
                return Err(Error::Resolution {
                    source_name: name.to_string(),
                    keyword: other.keyword(),
                    argument: other.argument().map(ToString::to_string),
                    loc: other.statement().loc,
                    message: "expected 'module' or 'submodule' at top level".to_string(),
                });
            }
        };
        self.register(module)
    }

    /// Insert a module into the registry and link it.
    ///
    /// The module is visible to lookups while its own links resolve, which
    /// is what lets mutual imports terminate. If linking fails the prior
    /// state of the entry is restored.
    fn register(&mut self, module: Module) -> Result<(String, bool), Error> {
        let name = module.name.clone();
        let is_submodule = module.is_submodule;

        let map = if is_submodule {
            &mut self.submodules
        } else {
            &mut self.modules
        };
        let previous = map.insert(name.clone(), module);
        if previous.is_some() {
            trace_event!(
                self.tracer,
                TraceLevel::Info,
                TraceEvent::ModuleReplaced { name: &name }
            );
        }

        self.in_progress.push(name.clone());
        let linked = self.link(&name, is_submodule);
        self.in_progress.pop();

        match linked {
            Ok(()) => {
                trace_event!(
                    self.tracer,
                    TraceLevel::Info,
                    TraceEvent::ModuleRegistered {
                        name: &name,
                        submodule: is_submodule,
                    }
                );
                Ok((name, is_submodule))
            }
            Err(err) => {
                let map = if is_submodule {
                    &mut self.submodules
                } else {
                    &mut self.modules
                };
                match previous {
                    Some(previous) => {
                        map.insert(name, previous);
                    }
                    None => {
                        map.remove(&name);
                    }
                }
                Err(err)
            }
        }
    }

    /// Resolve a registered module's imports and includes, then publish
    /// its prefix bindings and extension definitions.
    fn link(&mut self, name: &str, is_submodule: bool) -> Result<(), Error> {
        trace_event!(
            self.tracer,
            TraceLevel::Debug,
            TraceEvent::PhaseStart {
                phase: Phase::Link,
                module: name,
            }
        );

        // Snapshot what linking needs; loading targets mutates the maps.
        let entry = self.entry(name, is_submodule)?;
        let own_prefix = entry.prefix_name().map(ToString::to_string);
        let mut seen_prefixes = BTreeSet::new();
        if let Some(prefix) = entry.prefix_name() {
            seen_prefixes.insert(prefix);
        }
        let mut imports = Vec::new();
        for import in &entry.imports {
            let prefix = import.prefix.arg().ok_or_else(|| Error::Import {
                module: name.to_string(),
                target: import.module.clone(),
                message: "import prefix has no argument".to_string(),
            })?;
            // Prefixes must be unique within a module, the module's own
            // prefix included.
            if !seen_prefixes.insert(prefix) {
                return Err(Error::Resolution {
                    source_name: name.to_string(),
                    keyword: "import".to_string(),
                    argument: Some(import.module.clone()),
                    loc: import.stmt.loc,
                    message: format!("prefix '{prefix}' already bound"),
                });
            }
            imports.push((import.module.clone(), prefix.to_string()));
        }
        let includes: Vec<String> = entry.includes.iter().map(|i| i.module.clone()).collect();
        let extensions: Vec<(String, bool)> = entry
            .extensions
            .iter()
            .map(|e| (e.name.clone(), e.argument.is_some()))
            .collect();

        for (target, _) in &imports {
            if !self.load(name, target, false)? {
                return Err(Error::Import {
                    module: name.to_string(),
                    target: target.clone(),
                    message: "no source available".to_string(),
                });
            }
        }
        for target in &includes {
            if !self.load(name, target, true)? {
                return Err(Error::Import {
                    module: name.to_string(),
                    target: target.clone(),
                    message: "no source available".to_string(),
                });
            }
            let included = self.entry(target, true)?;
            let owner = included.belongs_to.as_ref().map(|b| b.module.as_str());
            if !is_submodule && owner != Some(name) {
                return Err(Error::Import {
                    module: name.to_string(),
                    target: target.clone(),
                    message: format!(
                        "submodule belongs to '{}'",
                        owner.unwrap_or("<none>")
                    ),
                });
            }
        }

        // A submodule's prefix is its parent module's; only modules
        // publish an own-prefix binding.
        if !is_submodule {
            if let Some(prefix) = own_prefix {
                self.own_prefixes.insert(prefix.clone(), name.to_string());
                trace_event!(
                    self.tracer,
                    TraceLevel::Debug,
                    TraceEvent::PrefixBound {
                        module: name,
                        prefix: &prefix,
                        target: name,
                    }
                );
            }
        }
        for (target, prefix) in imports {
            trace_event!(
                self.tracer,
                TraceLevel::Debug,
                TraceEvent::PrefixBound {
                    module: name,
                    prefix: &prefix,
                    target: &target,
                }
            );
            self.import_bindings.insert(prefix, target);
        }

        for (keyword, takes_argument) in extensions {
            trace_event!(
                self.tracer,
                TraceLevel::Info,
                TraceEvent::ExtensionRegistered {
                    module: name,
                    keyword: &keyword,
                }
            );
            self.grammar.register_extension(ExtensionSpec {
                module: name.to_string(),
                keyword,
                takes_argument,
            });
        }

        trace_event!(
            self.tracer,
            TraceLevel::Debug,
            TraceEvent::PhaseEnd {
                phase: Phase::Link,
                module: name,
            }
        );
        Ok(())
    }

    /// Make an import or include target available, loading its source
    /// through the provider when it is not yet registered.
    ///
    /// Returns `Ok(false)` when no source is available for the target, so
    /// callers can report the miss in their own terms (an import error
    /// during linking, a not-found error on the lookup path).
    fn load(&mut self, requester: &str, target: &str, want_submodule: bool) -> Result<bool, Error> {
        let known = if want_submodule {
            self.submodules.contains_key(target)
        } else {
            self.modules.contains_key(target)
        };
        if known || self.in_progress.iter().any(|n| n == target) {
            trace_event!(
                self.tracer,
                TraceLevel::Debug,
                TraceEvent::TargetAlreadyKnown {
                    module: requester,
                    target,
                }
            );
            return Ok(true);
        }

        let text = self.provider.as_mut().and_then(|provider| provider(target));
        trace_event!(
            self.tracer,
            TraceLevel::Debug,
            TraceEvent::SourceRequested {
                module: requester,
                target,
                found: text.is_some(),
            }
        );
        let Some(text) = text else {
            return Ok(false);
        };

        let (declared, is_submodule) = self.parse_source(&text, target)?;
        if declared != target {
            return Err(Error::Import {
                module: requester.to_string(),
                target: target.to_string(),
                message: format!("source declares '{declared}'"),
            });
        }
        if is_submodule != want_submodule {
            return Err(Error::Import {
                module: requester.to_string(),
                target: target.to_string(),
                message: if want_submodule {
                    "target is a module, not a submodule".to_string()
                } else {
                    "target is a submodule, not a module".to_string()
                },
            });
        }
        Ok(true)
    }

    fn entry(&self, name: &str, is_submodule: bool) -> Result<&Module, Error> {
        let map = if is_submodule {
            &self.submodules
        } else {
            &self.modules
        };
        map.get(name).ok_or_else(|| Error::NotFound {
            entity: if is_submodule { "submodule" } else { "module" },
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    const FOO: &str = r#"module foo { prefix "f"; namespace "urn:f"; }"#;

    fn test_module(import_reference: bool) -> String {
        let reference = if import_reference {
            r#"reference "bar";"#
        } else {
            ""
        };
        format!(
            r#"module test {{
                prefix "t";
                namespace "urn:t";
                import foo {{
                    prefix "f";
                    {reference}
                }}
            }}"#
        )
    }

    #[test]
    fn test_parse_and_find() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");

        let module = modules.find_module("foo").expect("lookup failure");
        assert_eq!(module.name, "foo");
        assert_eq!(module.prefix_name(), Some("f"));
    }

    #[test]
    fn test_find_module_by_prefix_prefers_own_prefix() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");
        modules
            .parse(&test_module(true), "test")
            .expect("parse failure");

        // "t" is declared by the test module itself.
        let by_t = modules.find_module_by_prefix("t").expect("lookup failure");
        assert_eq!(by_t.name, "test");

        // "f" is foo's own prefix and also test's import binding.
        let by_f = modules.find_module_by_prefix("f").expect("lookup failure");
        assert_eq!(by_f.name, "foo");

        let err = modules.find_module_by_prefix("x");
        assert!(matches!(err, Err(Error::NotFound { entity: "prefix", .. })));
    }

    #[test]
    fn test_import_metadata_survives() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");
        let module = modules
            .parse(&test_module(true), "test")
            .expect("parse failure");

        let import = &module.imports[0];
        assert_eq!(import.module, "foo");
        let reference = import.reference.as_ref().expect("reference");
        assert_eq!(reference.statement().arg(), Some("bar"));
    }

    #[test]
    fn test_lazy_load_through_provider() {
        let mut modules = Modules::new();
        modules.set_source_provider(|name| {
            (name == "foo").then(|| FOO.to_string())
        });

        let module = modules
            .parse(&test_module(false), "test")
            .expect("parse failure");
        assert_eq!(module.name, "test");

        let foo = modules.find_module("foo").expect("lookup failure");
        assert_eq!(foo.name, "foo");
    }

    #[test]
    fn test_unresolvable_import_rolls_back() {
        let mut modules = Modules::new();
        let err = modules.parse(&test_module(false), "test");
        match err {
            Err(Error::Import { module, target, .. }) => {
                assert_eq!(module, "test");
                assert_eq!(target, "foo");
            }
            other => panic!("expected import error, got {other:?}"),
        }

        // The failed module must not be registered.
        assert!(matches!(
            modules.find_module("test"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_miss_is_not_found() {
        // No provider configured.
        let mut modules = Modules::new();
        assert!(matches!(
            modules.find_module("ghost"),
            Err(Error::NotFound { entity: "module", .. })
        ));

        // A provider with nothing for the name behaves the same.
        let mut modules = Modules::new();
        modules.set_source_provider(|_| None);
        assert!(matches!(
            modules.find_module("ghost"),
            Err(Error::NotFound { entity: "module", .. })
        ));
        assert!(matches!(
            modules.find_submodule("ghost"),
            Err(Error::NotFound { entity: "submodule", .. })
        ));
    }

    #[test]
    fn test_parse_returns_submodule_entry() {
        let mut modules = Modules::new();
        let sub = modules
            .parse(
                r#"submodule parts { belongs-to main { prefix "m"; } }"#,
                "parts",
            )
            .expect("parse failure");
        assert!(sub.is_submodule);
        assert_eq!(sub.name, "parts");
    }

    #[test]
    fn test_reparse_replaces_entry() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");
        modules
            .parse(
                r#"module foo { prefix "f"; namespace "urn:f2"; }"#,
                "foo",
            )
            .expect("parse failure");

        let module = modules.find_module("foo").expect("lookup failure");
        assert_eq!(
            module.namespace.as_ref().and_then(|v| v.arg()),
            Some("urn:f2")
        );
    }

    #[test]
    fn test_failed_reparse_keeps_old_entry() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");
        let err = modules.parse(
            r#"module foo { prefix "f"; namespace "urn:f2"; import missing { prefix "m"; } }"#,
            "foo",
        );
        assert!(matches!(err, Err(Error::Import { .. })));

        let module = modules.find_module("foo").expect("lookup failure");
        assert_eq!(
            module.namespace.as_ref().and_then(|v| v.arg()),
            Some("urn:f")
        );
    }

    #[test]
    fn test_duplicate_import_prefix_rejected() {
        let mut modules = Modules::new();
        modules.parse(FOO, "foo").expect("parse failure");
        modules
            .parse(r#"module bar { prefix "b"; namespace "urn:b"; }"#, "bar")
            .expect("parse failure");

        let err = modules.parse(
            r#"module test {
                prefix "t";
                namespace "urn:t";
                import foo { prefix "p"; }
                import bar { prefix "p"; }
            }"#,
            "test",
        );
        match err {
            Err(Error::Resolution { argument, message, .. }) => {
                assert_eq!(argument.as_deref(), Some("bar"));
                assert!(message.contains("'p' already bound"));
            }
            other => panic!("expected resolution error, got {other:?}"),
        }
        assert!(matches!(
            modules.find_module("test"),
            Err(Error::NotFound { .. })
        ));

        // The module's own prefix counts too.
        let err = modules.parse(
            r#"module test {
                prefix "t";
                namespace "urn:t";
                import foo { prefix "t"; }
            }"#,
            "test",
        );
        assert!(matches!(err, Err(Error::Resolution { .. })));
    }

    #[test]
    fn test_mutual_imports_terminate() {
        let a = r#"module a { prefix "a"; namespace "urn:a"; import b { prefix "b"; } }"#;
        let b = r#"module b { prefix "b"; namespace "urn:b"; import a { prefix "a"; } }"#;

        let mut modules = Modules::new();
        modules.set_source_provider(move |name| match name {
            "a" => Some(a.to_string()),
            "b" => Some(b.to_string()),
            _ => None,
        });

        modules.parse(a, "a").expect("parse failure");
        assert!(modules.find_module("a").is_ok());
        assert!(modules.find_module("b").is_ok());
    }

    #[test]
    fn test_include_checks_belongs_to() {
        let main = r#"module main { prefix "m"; namespace "urn:m"; include sub; }"#;
        let sub = r#"submodule sub { belongs-to main { prefix "m"; } }"#;

        let mut modules = Modules::new();
        modules.set_source_provider(move |name| {
            (name == "sub").then(|| sub.to_string())
        });
        modules.parse(main, "main").expect("parse failure");
        assert!(modules.find_submodule("sub").is_ok());

        // A submodule belonging to a different module is rejected.
        let other = r#"module other { prefix "o"; namespace "urn:o"; include sub2; }"#;
        let sub2 = r#"submodule sub2 { belongs-to main { prefix "m"; } }"#;
        let mut modules = Modules::new();
        modules.set_source_provider(move |name| {
            (name == "sub2").then(|| sub2.to_string())
        });
        let err = modules.parse(other, "other");
        match err {
            Err(Error::Import { message, .. }) => {
                assert!(message.contains("belongs to 'main'"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_target_must_be_module() {
        let sub = r#"submodule foo { belongs-to main { prefix "m"; } }"#;
        let mut modules = Modules::new();
        modules.set_source_provider(move |name| {
            (name == "foo").then(|| sub.to_string())
        });
        let err = modules.parse(&test_module(false), "test");
        match err {
            Err(Error::Import { message, .. }) => {
                assert!(message.contains("submodule"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_declared_name_mismatch() {
        let mut modules = Modules::new();
        modules.set_source_provider(|name| {
            (name == "foo").then(|| {
                r#"module liar { prefix "l"; namespace "urn:l"; }"#.to_string()
            })
        });
        let err = modules.parse(&test_module(false), "test");
        match err {
            Err(Error::Import { message, .. }) => {
                assert!(message.contains("declares 'liar'"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_extensions_register_into_session_grammar() {
        let meta = r#"module meta {
            prefix "md";
            namespace "urn:meta";
            extension annotation { argument name; }
            extension flag;
        }"#;

        let mut modules = Modules::new();
        modules.parse(meta, "meta").expect("parse failure");

        let spec = modules.grammar().extension("annotation").expect("registered");
        assert!(spec.takes_argument);
        let spec = modules.grammar().extension("flag").expect("registered");
        assert!(!spec.takes_argument);

        // Later modules get the registered argument rule applied.
        let err = modules.parse(
            r#"module user {
                prefix "u";
                namespace "urn:u";
                import meta { prefix "md"; }
                md:annotation;
            }"#,
            "user",
        );
        match err {
            Err(Error::Resolution { keyword, .. }) => {
                assert_eq!(keyword, "md:annotation");
            }
            other => panic!("expected resolution error, got {other:?}"),
        }

        let module = modules
            .parse(
                r#"module user {
                    prefix "u";
                    namespace "urn:u";
                    import meta { prefix "md"; }
                    md:annotation note;
                }"#,
                "user",
            )
            .expect("parse failure");
        assert_eq!(module.unknown[0].arg(), Some("note"));
    }

    #[test]
    fn test_registration_traced() {
        struct Collector {
            names: Rc<RefCell<Vec<String>>>,
        }

        impl Tracer for Collector {
            fn trace(&mut self, _level: TraceLevel, event: TraceEvent<'_>) {
                if let TraceEvent::ModuleRegistered { name, .. } = event {
                    self.names.borrow_mut().push(name.to_string());
                }
            }
        }

        let names = Rc::new(RefCell::new(Vec::new()));
        let mut modules = Modules::new();
        modules.set_tracer(Box::new(Collector {
            names: Rc::clone(&names),
        }));

        modules.parse(FOO, "foo").expect("parse failure");
        assert_eq!(*names.borrow(), vec!["foo".to_string()]);
    }
}
