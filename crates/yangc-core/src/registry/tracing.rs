//! Registry tracing support.
//!
//! Structured trace events for debugging module registration and
//! cross-module linking. The default [`NoopTracer`] discards everything.

/// Trace verbosity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// Critical errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages (phase boundaries, module registration).
    Info,
    /// Detailed debugging (individual lookups, decisions).
    Debug,
    /// Verbose tracing (every operation).
    Trace,
}

/// Registration phase identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Parsing source text into a statement tree.
    Parse,
    /// Resolving the statement tree into typed nodes.
    Resolve,
    /// Linking imports and includes against the registry.
    Link,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Phase::Parse => write!(f, "parse"),
            Phase::Resolve => write!(f, "resolve"),
            Phase::Link => write!(f, "link"),
        }
    }
}

/// Structured trace events emitted during registration and linking.
#[derive(Clone, Debug)]
pub enum TraceEvent<'a> {
    /// A phase is starting for a module.
    PhaseStart { phase: Phase, module: &'a str },
    /// A phase has ended for a module.
    PhaseEnd { phase: Phase, module: &'a str },

    /// A module was added to the registry.
    ModuleRegistered {
        /// The module name.
        name: &'a str,
        /// Whether the entry is a submodule.
        submodule: bool,
    },
    /// A module re-registration replaced an earlier entry.
    ModuleReplaced {
        /// The module name.
        name: &'a str,
    },

    /// An import or include target was requested from the source provider.
    SourceRequested {
        /// The requesting module.
        module: &'a str,
        /// The requested module name.
        target: &'a str,
        /// Whether the provider returned text.
        found: bool,
    },
    /// An import target was already registered or in progress.
    TargetAlreadyKnown {
        /// The requesting module.
        module: &'a str,
        /// The import/include target.
        target: &'a str,
    },
    /// A prefix was bound for a module.
    PrefixBound {
        /// The module owning the binding.
        module: &'a str,
        /// The bound prefix.
        prefix: &'a str,
        /// The module the prefix refers to.
        target: &'a str,
    },
    /// An extension keyword was added to the session grammar.
    ExtensionRegistered {
        /// The defining module.
        module: &'a str,
        /// The extension keyword.
        keyword: &'a str,
    },
}

/// Trait for receiving trace events during registration.
///
/// Implement this trait to capture registry diagnostics. The tracer can
/// filter events by returning a minimum trace level from `level()`.
pub trait Tracer {
    /// Returns the minimum trace level to emit.
    ///
    /// Events below this level will not be passed to `trace()`.
    /// Default: `TraceLevel::Info`.
    fn level(&self) -> TraceLevel {
        TraceLevel::Info
    }

    /// Called for each trace event at or above the configured level.
    fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>);
}

/// A no-op tracer that discards all events.
///
/// Used as the default when tracing is not needed.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn level(&self) -> TraceLevel {
        // Admit only Error-level events; trace() discards those anyway.
        TraceLevel::Error
    }

    fn trace(&mut self, _level: TraceLevel, _event: TraceEvent<'_>) {
        // Intentionally empty
    }
}

/// Emit a trace event if the tracer level permits.
///
/// This macro checks the tracer's level before constructing the event,
/// enabling zero-cost tracing when the level is too low.
#[macro_export]
macro_rules! trace_event {
    ($tracer:expr, $level:expr, $event:expr) => {
        if $level <= $tracer.level() {
            $tracer.trace($level, $event);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    struct TestTracer {
        events: Vec<(TraceLevel, String)>,
        min_level: TraceLevel,
    }

    impl TestTracer {
        fn new(level: TraceLevel) -> Self {
            Self {
                events: Vec::new(),
                min_level: level,
            }
        }
    }

    impl Tracer for TestTracer {
        fn level(&self) -> TraceLevel {
            self.min_level
        }

        fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>) {
            self.events.push((level, format!("{event:?}")));
        }
    }

    #[test]
    fn test_noop_tracer() {
        let mut tracer = NoopTracer;
        tracer.trace(
            TraceLevel::Info,
            TraceEvent::PhaseStart {
                phase: Phase::Parse,
                module: "test",
            },
        );
        // Should not panic
    }

    #[test]
    fn test_trace_level_ordering() {
        assert!(TraceLevel::Error < TraceLevel::Warn);
        assert!(TraceLevel::Warn < TraceLevel::Info);
        assert!(TraceLevel::Info < TraceLevel::Debug);
        assert!(TraceLevel::Debug < TraceLevel::Trace);
    }

    #[test]
    fn test_trace_event_macro() {
        let mut tracer = TestTracer::new(TraceLevel::Info);

        // This should be captured
        trace_event!(
            tracer,
            TraceLevel::Info,
            TraceEvent::ModuleRegistered {
                name: "test",
                submodule: false,
            }
        );
        assert_eq!(tracer.events.len(), 1);

        // This should not be captured (below level)
        trace_event!(
            tracer,
            TraceLevel::Debug,
            TraceEvent::PhaseEnd {
                phase: Phase::Link,
                module: "test",
            }
        );
        assert_eq!(tracer.events.len(), 1);
    }
}
