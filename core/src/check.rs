#![deny(missing_docs)]

//! # Consistency Checks
//!
//! Read-only validations run over a frozen [`ApiSpec`] before anything is
//! exported:
//! - release metadata is present,
//! - every object definition points at a registered type,
//! - every property has a type and parent/child relations are mutual,
//! - every method returns something and every argument has a type.
//!
//! The checks run on scoped threads and all of their problems are reported
//! together.

use crate::error::{AppResult, CompositeError};
use crate::model::ApiSpec;
use std::thread;

type Check = fn(&ApiSpec) -> Vec<String>;

const CHECKS: [Check; 4] = [check_meta, check_data_types, check_types, check_methods];

impl ApiSpec {
    /// Runs every consistency check, failing with the full problem list.
    pub fn self_check(&self) -> AppResult<()> {
        let problems: Vec<String> = thread::scope(|s| {
            let running: Vec<_> = CHECKS.iter().map(|&check| s.spawn(move || check(self))).collect();
            running
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| vec!["consistency check panicked".to_string()])
                })
                .collect()
        });

        match CompositeError::from_problems(problems) {
            Some(err) => {
                tracing::warn!(problems = err.problems.len(), "self check failed");
                Err(err.into())
            }
            None => Ok(()),
        }
    }
}

fn check_meta(spec: &ApiSpec) -> Vec<String> {
    let mut problems = Vec::new();
    if spec.version().is_empty() {
        problems.push("version not set".to_string());
    }
    if spec.release_date().is_empty() {
        problems.push("release date not set".to_string());
    }
    if spec.link().is_empty() {
        problems.push("link not set".to_string());
    }
    problems
}

fn check_data_types(spec: &ApiSpec) -> Vec<String> {
    spec.data_type_definitions()
        .filter_map(|dt| dt.as_object())
        .filter(|obj| obj.reference().is_none())
        .map(|obj| {
            format!(
                "incorrect object data type, reference missed: {}",
                obj.name()
            )
        })
        .collect()
}

fn check_types(spec: &ApiSpec) -> Vec<String> {
    let mut problems = Vec::new();

    for t in spec.types() {
        for p in &t.properties {
            if p.data_types.is_empty() {
                problems.push(format!(
                    "incorrect property, data type missed (object: {} property: {})",
                    t.name, p.name
                ));
            }
        }

        if let Some(parent) = &t.parent {
            match spec.get_type(parent) {
                None => problems.push(format!(
                    "object {} has a parent {} which is missing in the objects list",
                    t.name, parent
                )),
                Some(p) if !p.children.contains(&t.name) => problems.push(format!(
                    "object {} has a parent {} which does not list it as a child",
                    t.name, parent
                )),
                Some(_) => {}
            }
        }

        for child in &t.children {
            match spec.get_type(child) {
                None => problems.push(format!(
                    "object {} has a child {} which is missing in the objects list",
                    t.name, child
                )),
                Some(c) if c.parent.as_deref() != Some(t.name.as_str()) => {
                    problems.push(format!(
                        "object {} has a child {} whose parent is not {}",
                        t.name, child, t.name
                    ))
                }
                Some(_) => {}
            }
        }
    }

    problems
}

fn check_methods(spec: &ApiSpec) -> Vec<String> {
    let mut problems = Vec::new();

    for m in spec.methods() {
        if m.returns.is_empty() {
            problems.push(format!("return types not set, method: {}", m.name));
        }

        for a in &m.arguments {
            if a.data_types.is_empty() {
                problems.push(format!(
                    "incorrect argument, data type missed (method: {} argument: {})",
                    m.name, a.name
                ));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Argument, MethodEntity, Property, SpecBuilder, TypeEntity};

    const LINK: &str = "https://core.telegram.org/bots/api";

    fn coherent_builder() -> SpecBuilder {
        let builder = SpecBuilder::new();
        builder.set_version("7.1").unwrap();
        builder.set_release_date("December 29, 2023").unwrap();
        builder
            .set_link("https://core.telegram.org/bots/api-changelog#december-29-2023")
            .unwrap();

        let mut user = TypeEntity::new("available-types", "User", LINK).unwrap();
        let mut id = Property::new("id").unwrap();
        id.data_types.push(builder.declare_data_type("int64"));
        user.properties.push(id);
        builder.add_type(user).unwrap();

        let mut get_me = MethodEntity::new("available-methods", "getMe", LINK).unwrap();
        get_me.returns.push(builder.declare_data_type("User"));
        builder.add_method(get_me).unwrap();

        builder
    }

    fn problems(err: AppError) -> Vec<String> {
        match err {
            AppError::Composite(c) => c.problems,
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_coherent_spec_passes() {
        coherent_builder().freeze().self_check().unwrap();
    }

    #[test]
    fn test_missing_meta_is_reported() {
        let builder = SpecBuilder::new();
        let problems = problems(builder.freeze().self_check().unwrap_err());
        assert_eq!(
            problems,
            vec!["version not set", "release date not set", "link not set"]
        );
    }

    #[test]
    fn test_dangling_object_is_named() {
        let builder = coherent_builder();
        let mut send = MethodEntity::new("available-methods", "sendMessage", LINK).unwrap();
        send.returns.push(builder.declare_data_type("Message"));
        builder.add_method(send).unwrap();

        let problems = problems(builder.freeze().self_check().unwrap_err());
        assert_eq!(
            problems,
            vec!["incorrect object data type, reference missed: Message"]
        );
    }

    #[test]
    fn test_all_problems_are_collected() {
        let builder = coherent_builder();

        let mut chat = TypeEntity::new("available-types", "Chat", LINK).unwrap();
        chat.properties.push(Property::new("id").unwrap());
        chat.children.push("ChatPrivate".to_string());
        builder.add_type(chat).unwrap();

        let mut close = MethodEntity::new("available-methods", "close", LINK).unwrap();
        close.arguments.push(Argument::new("force").unwrap());
        builder.add_method(close).unwrap();

        let problems = problems(builder.freeze().self_check().unwrap_err());
        assert_eq!(problems.len(), 4);
        assert!(problems.contains(
            &"incorrect property, data type missed (object: Chat property: id)".to_string()
        ));
        assert!(problems.contains(
            &"object Chat has a child ChatPrivate which is missing in the objects list".to_string()
        ));
        assert!(problems.contains(&"return types not set, method: close".to_string()));
        assert!(problems.contains(
            &"incorrect argument, data type missed (method: close argument: force)".to_string()
        ));
    }

    #[test]
    fn test_one_sided_relation_is_reported() {
        let builder = coherent_builder();
        let mut child = TypeEntity::new("available-types", "ChatMemberOwner", LINK).unwrap();
        child.parent = Some("User".to_string());
        builder.add_type(child).unwrap();

        let problems = problems(builder.freeze().self_check().unwrap_err());
        assert_eq!(
            problems,
            vec!["object ChatMemberOwner has a parent User which does not list it as a child"]
        );
    }
}
