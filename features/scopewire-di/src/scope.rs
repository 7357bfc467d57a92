use std::ops::Deref;

use crate::{cache::ScopeId, container::Injector};

/// An open scope of an [Injector]
///
/// While the guard is alive, scoped services resolve to the instances of this scope
/// (or of a scope opened later). Dropping the guard closes the scope on every exit
/// path, including early returns and resolution errors.
///
/// Derefs to the Injector, so services can be resolved through the guard.
#[must_use = "the scope is closed as soon as the guard is dropped"]
pub struct ScopeGuard {
    injector: Injector,
    id: ScopeId,
}
impl ScopeGuard {
    pub(crate) fn new(injector: Injector, id: ScopeId) -> Self {
        ScopeGuard { injector, id }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }
}
impl Deref for ScopeGuard {
    type Target = Injector;

    fn deref(&self) -> &Self::Target {
        &self.injector
    }
}
impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.injector.close_scope(self.id);
    }
}
impl std::fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScopeGuard").field(&self.id).finish()
    }
}
