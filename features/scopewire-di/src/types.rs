use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Errors returned by constructors and factories
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Instances may be shared between threads through the Injector
/// So anything injectable needs to be Send + Sync + 'static
///
/// Unsized types are allowed, services are usually trait objects (`dyn Logger`)
pub trait Injectable: Send + Sync + 'static {}
impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Type erased instance of a service
///
/// For a service `I` the erased value always holds an `Arc<I>`,
/// cloning the Instance clones the handle, not the service.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub(crate) fn new<I: ?Sized + Injectable>(instance: Arc<I>) -> Self {
        Instance {
            info: TypeInfo::of::<I>(),
            instance: Arc::new(instance),
        }
    }

    /// Returns the shared service handle, or the name of the stored type on mismatch
    pub fn downcast<I: ?Sized + Injectable>(&self) -> Result<Arc<I>, &'static str> {
        match self.instance.downcast_ref::<Arc<I>>() {
            Some(downcasted) => Ok(downcasted.clone()),
            None => Err(self.info.type_name),
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Type Name and Type Id
///
/// Used as the service identifier of every registration
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }
    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn downcast_returns_the_same_handle() {
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        let instance = Instance::new(greeter.clone());

        let resolved = instance.downcast::<dyn Greeter>().unwrap();
        assert!(Arc::ptr_eq(&greeter, &resolved));
        assert_eq!(resolved.greet(), "hello");
    }

    #[test]
    fn downcast_to_wrong_type_reports_stored_type() {
        let instance = Instance::new(Arc::new(5_u32));

        let err = instance.downcast::<String>().unwrap_err();
        assert_eq!(err, std::any::type_name::<u32>());
    }

    #[test]
    fn type_info_distinguishes_trait_objects_from_impls() {
        assert_ne!(TypeInfo::of::<dyn Greeter>(), TypeInfo::of::<English>());
        assert_eq!(TypeInfo::of::<dyn Greeter>(), TypeInfo::of::<dyn Greeter>());
    }
}
