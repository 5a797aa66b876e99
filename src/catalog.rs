//! Name-keyed catalog of directive handlers and discovery of handler types.
//!
//! Each entry keeps one representative instance (used for listing and role
//! inspection) and a factory. [`Catalog::get`] always builds a fresh instance
//! from the factory; the representative is never handed out.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::directive::Directive;
use crate::error::RegistryError;

/// Separator between segments of a handler type identifier.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Constructor producing a new, unbound handler instance.
pub type DirectiveFactory = Arc<dyn Fn() -> Box<dyn Directive> + Send + Sync>;

/// Build a factory for a handler type constructible with no arguments.
pub fn factory_of<D: Directive + Default>() -> DirectiveFactory {
    Arc::new(|| Box::new(D::default()))
}

struct CatalogEntry {
    representative: Box<dyn Directive>,
    factory: DirectiveFactory,
}

/// One representative handler per directive name.
///
/// The catalog is populated at startup and read afterwards. It has no
/// internal locking: mutate it before sharing it between threads.
#[derive(Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name.
    ///
    /// `handler` becomes the prototype: every [`Catalog::get`] returns a
    /// clone of it, configuration included. A previous entry with the same
    /// name is replaced.
    pub fn register<D: Directive + Clone>(&mut self, handler: D) {
        let prototype = handler.clone();
        let factory: DirectiveFactory = Arc::new(move || Box::new(prototype.clone()));
        self.insert(Box::new(handler), factory);
    }

    /// Register a handler built by `factory`.
    ///
    /// The factory is called once now to learn the directive name, and again
    /// for every [`Catalog::get`].
    pub fn register_factory<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Directive> + Send + Sync + 'static,
    {
        let factory: DirectiveFactory = Arc::new(factory);
        self.insert(factory(), factory);
    }

    fn insert(&mut self, representative: Box<dyn Directive>, factory: DirectiveFactory) {
        let name = representative.name().to_string();
        let entry = CatalogEntry {
            representative,
            factory,
        };
        if self.entries.insert(name.clone(), entry).is_some() {
            tracing::debug!(directive = %name, "replaced existing directive handler");
        } else {
            tracing::debug!(directive = %name, "registered directive handler");
        }
    }

    /// Fresh instance of the handler registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no handler has that name.
    pub fn get(&self, name: &str) -> Result<Box<dyn Directive>, RegistryError> {
        self.entries
            .get(name)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The stored representative, for inspection only.
    pub fn representative(&self, name: &str) -> Option<&dyn Directive> {
        self.entries.get(name).map(|entry| entry.representative.as_ref())
    }

    /// Registered directive names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan `roots` for handler types and register every one found.
    ///
    /// Type identifiers are derived from file paths relative to
    /// `namespace_root`; see [`PathDiscoverer`]. Returns the number of
    /// handlers registered.
    pub fn load<I, P, T>(
        &mut self,
        roots: I,
        namespace_prefix: &str,
        namespace_root: &Path,
        types: &T,
    ) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        T: TypeResolver + ?Sized,
    {
        let discoverer = PathDiscoverer::new(roots, namespace_prefix, namespace_root);
        self.load_from(&discoverer, types)
    }

    /// Register every discovered type identifier that names a handler.
    ///
    /// Identifiers the resolver does not know are skipped.
    pub fn load_from<D, T>(&mut self, discoverer: &D, types: &T) -> usize
    where
        D: Discoverer + ?Sized,
        T: TypeResolver + ?Sized,
    {
        let mut registered = 0;
        for type_id in discoverer.discover() {
            match types.factory(&type_id) {
                Some(factory) => {
                    let representative = factory();
                    tracing::trace!(type_id = %type_id, directive = representative.name(), "discovered handler");
                    self.insert(representative, factory);
                    registered += 1;
                }
                None => {
                    tracing::trace!(type_id = %type_id, "skipping candidate: not a directive handler");
                }
            }
        }
        tracing::info!(registered, total = self.len(), "directive discovery finished");
        registered
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("directives", &self.names())
            .finish()
    }
}

/// Maps a type identifier to a constructor for a handler type.
///
/// Returns `None` when the identifier does not name an instantiable
/// directive handler.
pub trait TypeResolver {
    fn factory(&self, type_id: &str) -> Option<DirectiveFactory>;
}

/// Explicit registration table of handler types keyed by type identifier.
#[derive(Default, Clone)]
pub struct TypeTable {
    types: HashMap<String, DirectiveFactory>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<D: Directive + Default>(&mut self, type_id: impl Into<String>) -> &mut Self {
        self.types.insert(type_id.into(), factory_of::<D>());
        self
    }

    pub fn insert_factory<F>(&mut self, type_id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Directive> + Send + Sync + 'static,
    {
        self.types.insert(type_id.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Known type identifiers, sorted.
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.types.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeTable {
    fn factory(&self, type_id: &str) -> Option<DirectiveFactory> {
        self.types.get(type_id).cloned()
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTable")
            .field("types", &self.type_ids())
            .finish()
    }
}

/// Source of candidate handler type identifiers.
pub trait Discoverer {
    fn discover(&self) -> Vec<String>;
}

/// Fixed list of type identifiers.
impl Discoverer for Vec<String> {
    fn discover(&self) -> Vec<String> {
        self.clone()
    }
}

/// Derives type identifiers from files under one or more directories.
///
/// `<namespace_root>/auth/guard.json` with prefix `app` becomes
/// `app::auth::guard`.
#[derive(Debug, Clone)]
pub struct PathDiscoverer {
    roots: Vec<PathBuf>,
    namespace_prefix: String,
    namespace_root: PathBuf,
}

impl PathDiscoverer {
    pub fn new<I, P>(roots: I, namespace_prefix: &str, namespace_root: &Path) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = root.as_ref().to_path_buf();
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        Self {
            roots: unique,
            namespace_prefix: namespace_prefix
                .trim_end_matches(NAMESPACE_SEPARATOR)
                .to_string(),
            namespace_root: namespace_root.to_path_buf(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Type identifier for `file`, or `None` if it lies outside the namespace root.
    pub fn type_id_for(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.namespace_root).ok()?;
        let stem = relative.with_extension("");
        let segments: Vec<String> = stem
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            return None;
        }
        let path_part = segments.join(NAMESPACE_SEPARATOR);
        if self.namespace_prefix.is_empty() {
            Some(path_part)
        } else {
            Some(format!(
                "{}{}{}",
                self.namespace_prefix, NAMESPACE_SEPARATOR, path_part
            ))
        }
    }
}

impl Discoverer for PathDiscoverer {
    fn discover(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut type_ids = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                tracing::trace!(root = %root.display(), "skipping discovery root: not a directory");
                continue;
            }
            let files = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());
            for entry in files {
                match self.type_id_for(entry.path()) {
                    // Nested roots reach the same file more than once.
                    Some(type_id) if !seen.insert(type_id.clone()) => {}
                    Some(type_id) => type_ids.push(type_id),
                    None => {
                        tracing::trace!(file = %entry.path().display(), "skipping file outside namespace root")
                    }
                }
            }
        }
        type_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directives::{ConstantDirective, RenameDirective, UpperDirective};
    use tempfile::tempdir;

    #[derive(Default, Clone)]
    struct Shadow;

    #[derive(Default, Clone)]
    struct Configured {
        name: String,
        limit: u32,
    }

    impl Directive for Configured {
        fn name(&self) -> &str {
            &self.name
        }
    }

    impl Directive for Shadow {
        fn name(&self) -> &str {
            "rename"
        }
    }

    #[test]
    fn get_unknown_name_fails() {
        let catalog = Catalog::new();
        let err = catalog.get("rename").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { ref name } if name == "rename"));
    }

    #[test]
    fn get_returns_fresh_instances_of_registered_type() {
        let mut catalog = Catalog::new();
        catalog.register(RenameDirective::default());

        let first = catalog.get("rename").unwrap();
        let second = catalog.get("rename").unwrap();
        assert!(first.is::<RenameDirective>());
        assert!(second.is::<RenameDirective>());

        let representative = catalog.representative("rename").unwrap();
        let first_ptr = first.as_ref() as *const dyn Directive as *const ();
        let second_ptr = second.as_ref() as *const dyn Directive as *const ();
        let stored_ptr = representative as *const dyn Directive as *const ();
        assert_ne!(first_ptr, second_ptr);
        assert_ne!(first_ptr, stored_ptr);
    }

    #[test]
    fn re_registration_overwrites() {
        let mut catalog = Catalog::new();
        catalog.register(RenameDirective::default());
        catalog.register(Shadow);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("rename").unwrap().is::<Shadow>());
    }

    #[test]
    fn register_factory_uses_factory_name() {
        let mut catalog = Catalog::new();
        catalog.register_factory(|| Box::new(UpperDirective::default()));
        assert_eq!(catalog.names(), vec!["upper"]);
        assert!(catalog.get("upper").unwrap().is::<UpperDirective>());
    }

    #[test]
    fn type_id_from_relative_path() {
        let discoverer =
            PathDiscoverer::new(["/srv/app/directives"], "app::", Path::new("/srv/app"));
        assert_eq!(
            discoverer.type_id_for(Path::new("/srv/app/directives/auth/guard.json")),
            Some("app::directives::auth::guard".to_string())
        );
        assert_eq!(discoverer.type_id_for(Path::new("/elsewhere/x.json")), None);
    }

    #[test]
    fn type_id_without_prefix() {
        let discoverer = PathDiscoverer::new(["/d"], "", Path::new("/d"));
        assert_eq!(
            discoverer.type_id_for(Path::new("/d/rename.toml")),
            Some("rename".to_string())
        );
    }

    #[test]
    fn discover_deduplicates_and_skips_missing_roots() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("rename.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("constant.json"), "{}").unwrap();

        let missing = dir.path().join("missing");
        let file_root = dir.path().join("rename.json");
        let discoverer = PathDiscoverer::new(
            [dir.path(), dir.path(), missing.as_path(), file_root.as_path()],
            "custom",
            dir.path(),
        );
        assert_eq!(discoverer.roots().len(), 3);
        assert_eq!(
            discoverer.discover(),
            vec!["custom::nested::constant", "custom::rename"]
        );
    }

    #[test]
    fn load_registers_only_known_handler_types() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("rename.json"), "{}").unwrap();
        std::fs::write(dir.path().join("helpers.json"), "{}").unwrap();

        let mut types = TypeTable::new();
        types.insert::<RenameDirective>("custom::rename");

        let mut catalog = Catalog::new();
        let registered = catalog.load([dir.path()], "custom", dir.path(), &types);
        assert_eq!(registered, 1);
        assert_eq!(catalog.names(), vec!["rename"]);
    }

    #[test]
    fn load_with_no_roots_is_noop() {
        let mut catalog = Catalog::new();
        let roots: Vec<PathBuf> = Vec::new();
        let registered = catalog.load(roots, "custom", Path::new("/"), &TypeTable::new());
        assert_eq!(registered, 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_from_explicit_list() {
        let mut types = TypeTable::new();
        types
            .insert::<RenameDirective>("builtin::rename")
            .insert::<ConstantDirective>("builtin::constant");

        let ids = vec![
            "builtin::constant".to_string(),
            "builtin::unknown".to_string(),
        ];
        let mut catalog = Catalog::new();
        assert_eq!(catalog.load_from(&ids, &types), 1);
        assert!(catalog.contains("constant"));
        assert!(!catalog.contains("rename"));
    }

    #[test]
    fn get_clones_the_registered_instance() {
        let mut catalog = Catalog::new();
        catalog.register(Configured {
            name: "auth".to_string(),
            limit: 5,
        });

        assert_eq!(catalog.names(), vec!["auth"]);
        let fetched = catalog.get("auth").unwrap();
        assert_eq!(fetched.name(), "auth");
        assert_eq!(fetched.downcast_ref::<Configured>().unwrap().limit, 5);
    }

    #[test]
    fn nested_roots_register_each_type_once() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("rename.json"), "{}").unwrap();

        let mut types = TypeTable::new();
        types.insert::<RenameDirective>("custom::sub::rename");

        let sub = dir.path().join("sub");
        let discoverer = PathDiscoverer::new([dir.path(), sub.as_path()], "custom", dir.path());
        assert_eq!(discoverer.discover(), vec!["custom::sub::rename"]);

        let mut catalog = Catalog::new();
        assert_eq!(catalog.load_from(&discoverer, &types), 1);
    }

    #[test]
    fn type_table_insert_factory() {
        let mut types = TypeTable::new();
        types.insert_factory("custom::named", || {
            Box::new(Configured {
                name: "named".to_string(),
                limit: 1,
            })
        });

        let mut catalog = Catalog::new();
        let ids = vec!["custom::named".to_string()];
        assert_eq!(catalog.load_from(&ids, &types), 1);
        assert_eq!(catalog.get("named").unwrap().name(), "named");
    }
}
