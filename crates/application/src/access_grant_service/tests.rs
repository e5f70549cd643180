use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use blend_core::AppError;
use blend_domain::{Group, Role};

use crate::test_support::FakeDirectoryClient;

use super::AccessGrantResolver;

fn models(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn groups(values: &[(&str, &str)]) -> Vec<Group> {
    values
        .iter()
        .map(|(group_id, name)| Group::new(*group_id, *name))
        .collect()
}

fn directory(roles: Vec<Role>, role_groups: Vec<(&str, Vec<Group>)>) -> Arc<FakeDirectoryClient> {
    Arc::new(FakeDirectoryClient {
        roles,
        role_groups: role_groups
            .into_iter()
            .map(|(role_id, groups)| (role_id.to_owned(), groups))
            .collect::<HashMap<_, _>>(),
        ..FakeDirectoryClient::default()
    })
}

#[tokio::test]
async fn single_role_granting_every_model_yields_its_groups() {
    let directory = directory(
        vec![Role::new("r1", ["m1", "m2"])],
        vec![("r1", groups(&[("g1", "g1")]))],
    );
    let resolver = AccessGrantResolver::new(directory);

    let grant = resolver
        .resolve(&models(&["m1", "m2"]), "blend_groups", "test_uuid")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(grant.allowed_values(), &models(&["g1"]));
    assert_eq!(grant.user_attribute(), "blend_groups");
    assert_eq!(grant.name(), "access_grant_test_uuid");
}

#[tokio::test]
async fn empty_models_fail_without_directory_calls() {
    let directory = directory(vec![Role::new("r1", ["m1"])], Vec::new());
    let resolver = AccessGrantResolver::new(directory.clone());

    let result = resolver.resolve(&BTreeSet::new(), "attr", "uuid").await;

    assert!(
        matches!(result, Err(AppError::Validation(message)) if message == "no models provided")
    );
    assert!(directory.calls.lock().await.is_empty());
}

#[tokio::test]
async fn disjoint_group_sets_report_no_intersection() {
    let directory = directory(
        vec![Role::new("r1", ["m1"]), Role::new("r2", ["m2"])],
        vec![
            ("r1", groups(&[("g1", "sales")])),
            ("r2", groups(&[("g2", "finance")])),
        ],
    );
    let resolver = AccessGrantResolver::new(directory);

    let result = resolver
        .resolve(&models(&["m1", "m2"]), "attr", "uuid")
        .await;

    assert!(matches!(result, Err(AppError::NoIntersection(_))));
}

#[tokio::test]
async fn ungranted_model_reports_its_empty_mapping() {
    let directory = directory(
        vec![Role::new("r1", ["m1"])],
        vec![("r1", groups(&[("g1", "sales")]))],
    );
    let resolver = AccessGrantResolver::new(directory);

    let result = resolver
        .resolve(&models(&["m1", "m2"]), "attr", "uuid")
        .await;

    let Err(AppError::NoIntersection(mapping)) = result else {
        panic!("expected no intersection");
    };
    assert!(mapping.contains("m1 -> roles [r1] groups [g1]"));
    assert!(mapping.contains("m2 -> roles [] groups []"));
}

#[tokio::test]
async fn model_groups_are_unioned_across_roles_before_intersecting() {
    let directory = directory(
        vec![
            Role::new("r1", ["m1"]),
            Role::new("r2", ["m2"]),
            Role::new("r3", ["m2"]),
        ],
        vec![
            ("r1", groups(&[("g1", "sales"), ("g2", "analysts")])),
            ("r2", groups(&[("g2", "analysts")])),
            ("r3", groups(&[("g3", "finance")])),
        ],
    );
    let resolver = AccessGrantResolver::new(directory);

    let grant = resolver
        .resolve(&models(&["m1", "m2"]), "attr", "uuid")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(grant.allowed_values(), &models(&["analysts"]));
}

#[tokio::test]
async fn shared_role_groups_are_fetched_once() {
    let directory = directory(
        vec![Role::new("r1", ["m1", "m2"]), Role::new("r2", ["m2"])],
        vec![
            ("r1", groups(&[("g1", "sales")])),
            ("r2", groups(&[("g1", "sales")])),
        ],
    );
    let resolver = AccessGrantResolver::new(directory.clone());

    let result = resolver
        .resolve(&models(&["m1", "m2"]), "attr", "uuid")
        .await;

    assert!(result.is_ok());
    assert_eq!(directory.calls_named("list_roles").await, 1);
    assert_eq!(directory.calls_named("list_groups_for_role:r1").await, 1);
    assert_eq!(directory.calls_named("list_groups_for_role:r2").await, 1);
}

#[tokio::test]
async fn unrelated_roles_are_never_expanded() {
    let directory = directory(
        vec![Role::new("r1", ["m1"]), Role::new("r9", ["other"])],
        vec![("r1", groups(&[("g1", "sales")]))],
    );
    let resolver = AccessGrantResolver::new(directory.clone());

    let result = resolver.resolve(&models(&["m1"]), "attr", "uuid").await;

    assert!(result.is_ok());
    assert_eq!(directory.calls_named("list_groups_for_role:r9").await, 0);
}

#[tokio::test]
async fn resolving_twice_yields_identical_values() {
    let directory = directory(
        vec![Role::new("r1", ["m1", "m2"]), Role::new("r2", ["m1", "m2"])],
        vec![
            ("r1", groups(&[("g1", "sales"), ("g2", "analysts")])),
            ("r2", groups(&[("g3", "finance")])),
        ],
    );
    let resolver = AccessGrantResolver::new(directory);
    let requested = models(&["m1", "m2"]);

    let first = resolver
        .resolve(&requested, "attr", "uuid")
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = resolver
        .resolve(&requested, "attr", "uuid")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.allowed_values(), second.allowed_values());
    assert_eq!(
        first.allowed_values(),
        &models(&["analysts", "finance", "sales"])
    );
}

#[tokio::test]
async fn directory_failures_propagate_unmasked() {
    let directory = Arc::new(FakeDirectoryClient {
        unavailable: true,
        ..FakeDirectoryClient::default()
    });
    let resolver = AccessGrantResolver::new(directory);

    let result = resolver.resolve(&models(&["m1"]), "attr", "uuid").await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}
