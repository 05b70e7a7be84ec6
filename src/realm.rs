//! Realm construction (§4.C): the global object, global environment, and
//! every prototype table, built once per `Engine`. Grounded on
//! `boa::realm::Realm::create`/`new_global_environment`.

use crate::environment::{new_environment, Environment, EnvironmentExt};
use crate::error::JsResult;
use crate::object::Object;
use crate::value::{object as value_object, Value, ValueExt};
use gc::{Finalize, Trace};

#[derive(Trace, Finalize)]
pub struct Realm {
    pub global_object: Value,
    pub global_environment: Environment,
    pub object_prototype: Value,
    pub function_prototype: Value,
    pub array_prototype: Value,
    pub string_prototype: Value,
    pub number_prototype: Value,
    pub boolean_prototype: Value,
    pub regexp_prototype: Value,
    pub error_prototype: Value,
    pub byte_array_prototype: Value,
    /// Shared prototype for every `document.createElement(...)` result and
    /// the `document`/shadow-root nodes themselves, installed by
    /// `facade::document::install`.
    pub element_prototype: Value,
    /// Shared prototype for `Event`/`MouseEvent` instances.
    pub event_prototype: Value,
    /// Kept on the realm (not just consumed by `Realm::new`) so a `Worker`
    /// constructed from script at arbitrary runtime can spawn a child
    /// realm configured the same way as its parent.
    pub host_config: HostConfig,
}

/// Configuration an embedder supplies when seeding a realm (§6).
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub domain: String,
    pub user_agent: String,
    pub html: String,
    pub language: Option<String>,
    pub platform: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            domain: "https://example.com/".to_string(),
            user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                    .to_string(),
            html: "<html><head></head><body></body></html>".to_string(),
            language: None,
            platform: None,
        }
    }
}

impl Realm {
    pub fn new(config: &HostConfig) -> Self {
        let object_prototype = value_object(Object::new());
        let function_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let array_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let string_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let number_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let boolean_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let regexp_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let error_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let byte_array_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let element_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));
        let event_prototype = value_object(Object::with_prototype(Some(object_prototype.clone())));

        crate::prototypes::install_object_prototype(&object_prototype);
        crate::prototypes::install_array_prototype(&array_prototype);
        crate::prototypes::install_string_prototype(&string_prototype);
        crate::prototypes::install_number_prototype(&number_prototype);
        crate::prototypes::install_regexp_prototype(&regexp_prototype);
        crate::prototypes::install_error_prototype(&error_prototype);
        crate::prototypes::install_byte_array_prototype(&byte_array_prototype);

        let global_environment = new_environment(None);
        // The global object *is* `window`/`globalThis`/`self`/`parent` —
        // spec.md §4.B requires these to be the same reflective root, so
        // there is exactly one object allocated here, never a separate
        // "window" record aliased to it.
        let global_object = value_object(Object::with_prototype(Some(object_prototype.clone())));

        let mut realm = Realm {
            global_object,
            global_environment,
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            regexp_prototype,
            error_prototype,
            byte_array_prototype,
            element_prototype,
            event_prototype,
            host_config: config.clone(),
        };

        crate::facade::window::install(&mut realm, config);
        realm
    }

    /// Binds `value` both as a global identifier (so bare `name` resolves
    /// via the environment chain) and as an own property of the global
    /// object (so `window.name`/`globalThis.name` sees the same value) —
    /// the two are one storage location in a real engine, so every facade
    /// installer goes through this instead of picking one or the other.
    pub(crate) fn define_global(&mut self, name: &str, value: Value) {
        self.global_environment.declare_var(name, value.clone());
        if let Some(obj) = self.global_object.as_object() {
            obj.borrow_mut().set_own(name, value);
        }
    }

    /// Compiles `pattern`/`flags` eagerly so a malformed literal surfaces
    /// as a `SyntaxError` at the point it's written, matching how a real
    /// engine rejects invalid regex literals at parse time.
    pub fn make_regex(&self, pattern: &str, flags: &str) -> JsResult<Value> {
        crate::prototypes::regexp::construct(pattern, flags, &self.regexp_prototype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentExt;

    #[test]
    fn window_globalthis_self_and_parent_all_alias_one_object() {
        let realm = Realm::new(&HostConfig::default());
        // Mutating through `globalThis` should be visible through every
        // other alias, since they're all the same underlying object.
        let global_this = realm.global_object.as_object().unwrap().borrow().get_own("globalThis").unwrap();
        global_this.as_object().unwrap().borrow_mut().set_own("probe", crate::value::number(7.0));

        for alias in ["window", "self", "parent"] {
            let aliased = realm.global_object.as_object().unwrap().borrow().get_own(alias).unwrap();
            let probe = aliased.as_object().unwrap().borrow().get_own("probe").unwrap();
            assert_eq!(crate::value::to_number(&probe), 7.0, "{alias} did not see the mutation through globalThis");
        }
        let own_probe = realm.global_object.as_object().unwrap().borrow().get_own("probe").unwrap();
        assert_eq!(crate::value::to_number(&own_probe), 7.0);
    }

    #[test]
    fn every_prototype_chains_up_to_object_prototype() {
        let realm = Realm::new(&HostConfig::default());
        for proto in [
            &realm.array_prototype,
            &realm.string_prototype,
            &realm.number_prototype,
            &realm.boolean_prototype,
            &realm.regexp_prototype,
            &realm.error_prototype,
            &realm.byte_array_prototype,
        ] {
            let parent = proto.as_object().unwrap().borrow().prototype().cloned();
            let parent = parent.expect("prototype chain should not be empty");
            parent.as_object().unwrap().borrow_mut().set_own("probe_marker", crate::value::boolean(true));
            let seen = realm.object_prototype.as_object().unwrap().borrow().get_own("probe_marker");
            assert!(seen.is_some(), "prototype does not chain up to the shared object prototype");
        }
    }

    #[test]
    fn define_global_is_visible_both_as_an_identifier_and_as_a_global_object_property() {
        let mut realm = Realm::new(&HostConfig::default());
        realm.define_global("answer", crate::value::number(42.0));
        let via_identifier = realm.global_environment.get_binding("answer").unwrap();
        let via_property = realm.global_object.as_object().unwrap().borrow().get_own("answer").unwrap();
        assert_eq!(crate::value::to_number(&via_identifier), 42.0);
        assert_eq!(crate::value::to_number(&via_property), 42.0);
    }

    #[test]
    fn make_regex_rejects_an_invalid_pattern() {
        let realm = Realm::new(&HostConfig::default());
        assert!(realm.make_regex("(", "").is_err());
    }

    #[test]
    fn make_regex_accepts_a_valid_pattern_and_flags() {
        let realm = Realm::new(&HostConfig::default());
        assert!(realm.make_regex("a+", "g").is_ok());
    }
}
