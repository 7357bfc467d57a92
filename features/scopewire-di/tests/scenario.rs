use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use scopewire_di::{
    Arguments, Component, DynError, Injector, Parameter, Registration, ResolveError, Target,
    TypeInfo,
};

trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn lines(&self) -> Vec<String>;
}

#[derive(Default)]
struct ConsoleLogger {
    lines: Mutex<Vec<String>>,
}
impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[log] {message}");
        self.lines.lock().push(message.to_string());
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}
impl Component for ConsoleLogger {
    fn parameters() -> Vec<Parameter> {
        vec![]
    }

    fn construct(_: &Arguments) -> Result<Self, DynError> {
        Ok(ConsoleLogger::default())
    }
}

trait Database: Send + Sync {
    fn insert(&self, key: &str, value: &str);
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Default)]
struct InMemoryDatabase {
    rows: Mutex<HashMap<String, String>>,
}
impl Database for InMemoryDatabase {
    fn insert(&self, key: &str, value: &str) {
        self.rows.lock().insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.rows.lock().get(key).cloned()
    }
}
impl Component for InMemoryDatabase {
    fn parameters() -> Vec<Parameter> {
        vec![]
    }

    fn construct(_: &Arguments) -> Result<Self, DynError> {
        Ok(InMemoryDatabase::default())
    }
}

struct UserService {
    logger: Arc<dyn Logger>,
    database: Arc<dyn Database>,
}
impl UserService {
    fn create_user(&self, name: &str) {
        self.database.insert(name, "active");
        self.logger.log(&format!("created user {name}"));
    }
}
impl Component for UserService {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::service::<dyn Logger>("logger"),
            Parameter::service::<dyn Database>("database"),
        ]
    }

    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(UserService {
            logger: args.service("logger")?,
            database: args.service("database")?,
        })
    }
}

fn wire() -> Injector {
    let injector = Injector::new();
    injector
        .register(Registration::new(Target::<dyn Logger>::bind::<ConsoleLogger>(|logger| logger)).singleton())
        .unwrap();
    injector
        .register(Registration::new(Target::<dyn Database>::bind::<InMemoryDatabase>(|db| db)).scoped())
        .unwrap();
    injector
        .register(Registration::new(Target::<UserService>::component()).transient())
        .unwrap();
    injector
}

#[test]
fn user_services_share_logger_and_database_within_a_scope() {
    let injector = wire();
    let scope = injector.open_scope();

    let first = scope.get_instance::<UserService>().unwrap();
    let second = scope.get_instance::<UserService>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.logger, &second.logger));
    assert!(Arc::ptr_eq(&first.database, &second.database));

    first.create_user("ada");
    assert_eq!(second.database.get("ada").as_deref(), Some("active"));
    assert_eq!(second.logger.lines(), vec!["created user ada".to_string()]);
}

#[test]
fn a_new_scope_gets_a_new_database_but_the_same_logger() {
    let injector = wire();

    let first = {
        let _scope = injector.open_scope();
        let service = injector.get_instance::<UserService>().unwrap();
        service.create_user("ada");
        service
    };

    let _scope = injector.open_scope();
    let second = injector.get_instance::<UserService>().unwrap();

    assert!(Arc::ptr_eq(&first.logger, &second.logger));
    assert!(!Arc::ptr_eq(&first.database, &second.database));
    assert_eq!(second.database.get("ada"), None);
}

#[test]
fn user_service_needs_a_scope_for_its_database() {
    let injector = wire();

    let err = injector.get_instance::<UserService>().err().unwrap();
    assert!(matches!(err, ResolveError::NoActiveScope(info) if info == TypeInfo::of::<dyn Database>()));

    let _scope = injector.open_scope();
    assert!(injector.get_instance::<UserService>().is_ok());
}

#[test]
fn singleton_logger_survives_scopes() {
    let injector = wire();

    let outside = injector.get_instance::<dyn Logger>().unwrap();
    let inside = {
        let scope = injector.open_scope();
        scope.get_instance::<UserService>().unwrap().logger.clone()
    };

    assert!(Arc::ptr_eq(&outside, &inside));
    assert!(injector.validate().is_ok());
}
