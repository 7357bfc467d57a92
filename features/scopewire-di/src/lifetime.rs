/// How long a resolved instance is reused
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// A new instance on every resolution, never cached
    #[default]
    Transient,
    /// One instance per open scope, cached in the innermost scope frame
    Scoped,
    /// One instance for the whole life of the Injector
    Singleton,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("Transient"),
            Lifetime::Scoped => f.write_str("Scoped"),
            Lifetime::Singleton => f.write_str("Singleton"),
        }
    }
}
