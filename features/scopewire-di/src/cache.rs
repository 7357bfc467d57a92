use std::{
    any::TypeId,
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::types::{Instance, TypeInfo};

/// Instances of singleton services, written once and never evicted
#[derive(Default)]
pub(crate) struct SingletonCache {
    instances: HashMap<TypeId, Instance>,
}
impl SingletonCache {
    pub fn get(&self, service: &TypeInfo) -> Option<&Instance> {
        self.instances.get(&service.type_id)
    }

    pub fn insert(&mut self, instance: Instance) {
        self.instances.insert(instance.info.type_id, instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

/// Identifier of one open scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);
impl ScopeId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        ScopeId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}
impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Scoped instances created while this frame was the innermost one
pub(crate) struct ScopeFrame {
    id: ScopeId,
    instances: HashMap<TypeId, Instance>,
}
impl ScopeFrame {
    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

/// Stack of open scope frames, only the top frame is used for resolution
#[derive(Default)]
pub(crate) struct ScopeStack {
    frames: Vec<ScopeFrame>,
}
impl ScopeStack {
    pub fn open(&mut self) -> ScopeId {
        let id = ScopeId::next();
        self.frames.push(ScopeFrame {
            id,
            instances: HashMap::new(),
        });
        id
    }

    /// Removes exactly the frame with the given id
    ///
    /// Returns the frame and whether it was the innermost one.
    pub fn close(&mut self, id: ScopeId) -> Option<(ScopeFrame, bool)> {
        let position = self.frames.iter().rposition(|frame| frame.id == id)?;
        let innermost = position + 1 == self.frames.len();
        Some((self.frames.remove(position), innermost))
    }

    pub fn get(&self, service: &TypeInfo) -> Option<&Instance> {
        self.frames.last()?.instances.get(&service.type_id)
    }

    /// Stores into the innermost frame, hands the instance back if no scope is open
    pub fn insert(&mut self, instance: Instance) -> Result<(), Instance> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.instances.insert(instance.info.type_id, instance);
                Ok(())
            }
            None => Err(instance),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
