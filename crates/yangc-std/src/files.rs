//! Filesystem-backed module loading.
//!
//! [`SearchPaths`] resolves module names to files on disk and plugs into
//! [`Modules`] as a source provider, so imports and includes load on
//! demand the same way in-memory sources do.

use std::fs;
use std::path::PathBuf;
use yangc_core::Modules;

/// Ordered list of directories searched for module sources.
///
/// For a module name `m`, each directory is probed for `m` and `m.yang`,
/// in that order. The first readable file wins.
#[derive(Clone, Debug, Default)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Create an empty search path list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory to the search order.
    pub fn add<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.dirs.push(dir.into());
        self
    }

    /// Find and read the source for a module name.
    ///
    /// Returns the path it was found at along with the file contents.
    /// Unreadable candidates are skipped, not reported.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<(PathBuf, String)> {
        for dir in &self.dirs {
            for candidate in [dir.join(name), dir.join(format!("{name}.yang"))] {
                if let Ok(text) = fs::read_to_string(&candidate) {
                    return Some((candidate, text));
                }
            }
        }
        None
    }

    /// Install this search path list as the session's source provider.
    pub fn install(self, modules: &mut Modules) {
        modules.set_source_provider(move |name| self.find(name).map(|(_, text)| text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Scratch directory that cleans up after itself.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("yangc-{tag}-{}", std::process::id()));
            fs::create_dir_all(&dir).expect("create scratch dir");
            Self(dir)
        }

        fn write(&self, name: &str, text: &str) {
            fs::write(self.0.join(name), text).expect("write scratch file");
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_find_with_and_without_extension() {
        let scratch = Scratch::new("find");
        scratch.write("foo.yang", "module foo;");
        scratch.write("bare", "module bare;");

        let mut paths = SearchPaths::new();
        paths.add(scratch.path());

        let (path, text) = paths.find("foo").expect("find failure");
        assert!(path.ends_with("foo.yang"));
        assert_eq!(text, "module foo;");

        let (path, _) = paths.find("bare").expect("find failure");
        assert!(path.ends_with("bare"));

        assert!(paths.find("missing").is_none());
    }

    #[test]
    fn test_search_order() {
        let first = Scratch::new("order-a");
        let second = Scratch::new("order-b");
        first.write("m.yang", "first");
        second.write("m.yang", "second");

        let mut paths = SearchPaths::new();
        paths.add(first.path()).add(second.path());

        let (_, text) = paths.find("m").expect("find failure");
        assert_eq!(text, "first");
    }

    #[test]
    fn test_imports_load_from_disk() {
        let scratch = Scratch::new("imports");
        scratch.write(
            "dep.yang",
            r#"module dep { prefix "d"; namespace "urn:dep"; }"#,
        );

        let mut paths = SearchPaths::new();
        paths.add(scratch.path());

        let mut modules = Modules::new();
        paths.install(&mut modules);

        modules
            .parse(
                r#"module top {
                    prefix "t";
                    namespace "urn:top";
                    import dep { prefix "d"; }
                }"#,
                "top",
            )
            .expect("parse failure");

        let dep = modules.find_module("dep").expect("lookup failure");
        assert_eq!(dep.prefix_name(), Some("d"));
    }
}
