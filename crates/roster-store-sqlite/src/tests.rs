//! Integration tests for `SqlitePersonStore` against an in-memory database.

use roster_core::{
  person::{NewPerson, PersonKind},
  role::{Role, RoleDefinition},
  store::{PersonQuery, PersonStore},
};

use crate::SqlitePersonStore;

async fn store() -> SqlitePersonStore {
  SqlitePersonStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(site_id: i64, user_id: i64, name: &str) -> NewPerson {
  let mut input =
    NewPerson::new(site_id, user_id, PersonKind::User, name.to_lowercase(), name);
  input.role = Some(Role::Editor);
  input
}

fn new_follower(site_id: i64, user_id: i64, name: &str) -> NewPerson {
  NewPerson::new(site_id, user_id, PersonKind::Follower, name.to_lowercase(), name)
}

// ─── Insert & lookup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_person() {
  let s = store().await;

  let inserted = s.insert_person(new_user(1, 7, "Alice")).await.unwrap();
  assert_eq!(inserted.role, Some(Role::Editor));

  let fetched = s.person(1, 7, PersonKind::User).await.unwrap();
  assert_eq!(fetched, Some(inserted));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  let result = s.person(1, 42, PersonKind::User).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn insert_duplicate_key_errors() {
  let s = store().await;
  s.insert_person(new_user(1, 7, "Alice")).await.unwrap();

  let err = s.insert_person(new_user(1, 7, "Alice Again")).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicatePerson { user_id: 7, .. }));
}

#[tokio::test]
async fn same_user_id_allowed_across_kinds() {
  let s = store().await;
  s.insert_person(new_user(1, 7, "Alice")).await.unwrap();
  s.insert_person(new_follower(1, 7, "Alice")).await.unwrap();

  let people = s.list_people(PersonQuery::site(1)).await.unwrap();
  assert_eq!(people.len(), 2);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_person_overwrites_but_keeps_created_at() {
  let s = store().await;
  let original = s.insert_person(new_user(1, 7, "Alice")).await.unwrap();

  let mut changed = original.clone();
  changed.display_name = "Alice Liddell".to_string();
  changed.role = Some(Role::Administrator);
  s.update_person(changed).await.unwrap();

  let fetched = s.person(1, 7, PersonKind::User).await.unwrap().unwrap();
  assert_eq!(fetched.display_name, "Alice Liddell");
  assert_eq!(fetched.role, Some(Role::Administrator));
  assert_eq!(fetched.created_at, original.created_at);
}

#[tokio::test]
async fn update_missing_person_errors() {
  let s = store().await;
  let phantom = s.insert_person(new_user(1, 1, "Alice")).await.unwrap();
  s.delete_person(1, 1, PersonKind::User).await.unwrap();

  let err = s.update_person(phantom).await.unwrap_err();
  assert!(matches!(err, crate::Error::PersonNotFound { .. }));
}

// ─── Delete & restore ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_person_reports_whether_row_existed() {
  let s = store().await;
  s.insert_person(new_user(1, 7, "Alice")).await.unwrap();

  assert!(s.delete_person(1, 7, PersonKind::User).await.unwrap());
  assert!(!s.delete_person(1, 7, PersonKind::User).await.unwrap());
}

#[tokio::test]
async fn restore_person_reinserts_verbatim() {
  let s = store().await;
  let snapshot = s.insert_person(new_user(1, 7, "Alice")).await.unwrap();

  s.delete_person(1, 7, PersonKind::User).await.unwrap();
  s.restore_person(snapshot.clone()).await.unwrap();

  let restored = s.person(1, 7, PersonKind::User).await.unwrap().unwrap();
  assert_eq!(restored, snapshot);
}

#[tokio::test]
async fn restore_person_overwrites_intervening_row() {
  let s = store().await;
  let snapshot = s.insert_person(new_user(1, 7, "Alice")).await.unwrap();
  s.delete_person(1, 7, PersonKind::User).await.unwrap();

  // Someone re-created the key with different data in the meantime.
  s.insert_person(new_user(1, 7, "Imposter")).await.unwrap();

  s.restore_person(snapshot.clone()).await.unwrap();
  let restored = s.person(1, 7, PersonKind::User).await.unwrap().unwrap();
  assert_eq!(restored, snapshot);
}

// ─── Retain ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn retain_people_scoped_to_site_and_kind() {
  let s = store().await;
  s.insert_person(new_user(1, 1, "Alice")).await.unwrap();
  s.insert_person(new_user(1, 2, "Bob")).await.unwrap();
  s.insert_person(new_follower(1, 3, "Carol")).await.unwrap();
  s.insert_person(new_user(2, 4, "Dave")).await.unwrap();

  let removed = s.retain_people(1, PersonKind::User, vec![1]).await.unwrap();
  assert_eq!(removed, 1);

  assert!(s.person(1, 1, PersonKind::User).await.unwrap().is_some());
  assert!(s.person(1, 2, PersonKind::User).await.unwrap().is_none());
  // Other kinds and other sites are untouched.
  assert!(s.person(1, 3, PersonKind::Follower).await.unwrap().is_some());
  assert!(s.person(2, 4, PersonKind::User).await.unwrap().is_some());
}

#[tokio::test]
async fn retain_with_empty_keep_removes_all_of_kind() {
  let s = store().await;
  s.insert_person(new_user(1, 1, "Alice")).await.unwrap();
  s.insert_person(new_user(1, 2, "Bob")).await.unwrap();
  s.insert_person(new_follower(1, 3, "Carol")).await.unwrap();

  let removed = s.retain_people(1, PersonKind::User, vec![]).await.unwrap();
  assert_eq!(removed, 2);
  assert!(s.person(1, 3, PersonKind::Follower).await.unwrap().is_some());
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_people_ordered_by_display_name() {
  let s = store().await;
  s.insert_person(new_user(1, 1, "carol")).await.unwrap();
  s.insert_person(new_user(1, 2, "Alice")).await.unwrap();
  s.insert_person(new_user(1, 3, "Bob")).await.unwrap();

  let people = s.list_people(PersonQuery::site(1)).await.unwrap();
  let names: Vec<&str> = people.iter().map(|p| p.display_name.as_str()).collect();
  assert_eq!(names, ["Alice", "Bob", "carol"]);
}

#[tokio::test]
async fn list_people_filters_by_kind_and_search() {
  let s = store().await;
  s.insert_person(new_user(1, 1, "Alice")).await.unwrap();
  s.insert_person(new_user(1, 2, "Bob")).await.unwrap();
  s.insert_person(new_follower(1, 3, "Alicia")).await.unwrap();

  let mut query = PersonQuery::site(1);
  query.kind = Some(PersonKind::User);
  query.search = Some("Ali".to_string());

  let people = s.list_people(query).await.unwrap();
  assert_eq!(people.len(), 1);
  assert_eq!(people[0].display_name, "Alice");
}

#[tokio::test]
async fn list_people_respects_limit_and_offset() {
  let s = store().await;
  s.insert_person(new_user(1, 1, "Alice")).await.unwrap();
  s.insert_person(new_user(1, 2, "Bob")).await.unwrap();
  s.insert_person(new_user(1, 3, "Carol")).await.unwrap();

  let mut query = PersonQuery::site(1);
  query.limit = Some(1);
  query.offset = Some(1);

  let people = s.list_people(query).await.unwrap();
  assert_eq!(people.len(), 1);
  assert_eq!(people[0].display_name, "Bob");
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_roles_replaces_previous_set() {
  let s = store().await;
  s.save_roles(
    1,
    vec![RoleDefinition { slug: Role::Subscriber, name: "Subscriber".into() }],
  )
  .await
  .unwrap();

  s.save_roles(
    1,
    vec![
      RoleDefinition { slug: Role::Administrator, name: "Administrator".into() },
      RoleDefinition {
        slug: Role::Custom("shop_manager".into()),
        name: "Shop Manager".into(),
      },
    ],
  )
  .await
  .unwrap();

  let roles = s.roles(1).await.unwrap();
  assert_eq!(roles.len(), 2);
  assert_eq!(roles[0].slug, Role::Administrator);
  assert_eq!(roles[1].slug, Role::Custom("shop_manager".into()));
}

#[tokio::test]
async fn roles_are_per_site() {
  let s = store().await;
  s.save_roles(1, vec![RoleDefinition { slug: Role::Editor, name: "Editor".into() }])
    .await
    .unwrap();

  assert!(s.roles(2).await.unwrap().is_empty());
}
