//! Wire DTOs for the remote people API.
//!
//! The remote predates this client and uses WordPress-flavoured field names
//! (`ID`, `avatar_URL`, listing arrays named after the kind). Serde aliases
//! absorb the variation so one DTO covers all three listing endpoints.

use roster_core::{
  person::PersonKind,
  remote::RemotePerson,
  role::{Role, RoleDefinition},
};
use serde::Deserialize;

// ─── People listings ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PersonDto {
  #[serde(alias = "ID")]
  pub id:             i64,
  #[serde(default)]
  pub login:          String,
  #[serde(alias = "name", default)]
  pub display_name:   String,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub email:          Option<String>,
  #[serde(alias = "avatar_URL")]
  pub avatar_url:     Option<String>,
  /// Team members carry a roles array; the first entry is the primary role.
  pub roles:          Option<Vec<String>>,
  #[serde(default)]
  pub is_super_admin: bool,
}

impl PersonDto {
  pub fn into_remote_person(self, kind: PersonKind) -> RemotePerson {
    let role = match kind {
      PersonKind::User => self
        .roles
        .as_ref()
        .and_then(|roles| roles.first())
        .map(|slug| Role::from_slug(slug)),
      _ => None,
    };

    RemotePerson {
      user_id: self.id,
      kind,
      login: self.login,
      display_name: self.display_name,
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      avatar_url: self.avatar_url,
      role,
      is_super_admin: self.is_super_admin,
    }
  }
}

/// Listing response; the people array is named after the endpoint's kind.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
  /// Total number of matching people on the remote, across all pages.
  pub found:  usize,
  #[serde(alias = "users", alias = "followers", alias = "viewers")]
  pub people: Vec<PersonDto>,
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleDto {
  /// The role slug; the remote calls this field `name`.
  pub name:         String,
  pub display_name: String,
}

impl RoleDto {
  pub fn into_definition(self) -> RoleDefinition {
    RoleDefinition {
      slug: Role::from_slug(&self.name),
      name: self.display_name,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct RolesResponse {
  pub roles: Vec<RoleDto>,
}

// ─── Invitations ─────────────────────────────────────────────────────────────

/// Response of both invitation endpoints. A 200 can still carry
/// per-recipient errors.
#[derive(Debug, Deserialize)]
pub struct InviteResponse {
  #[serde(default)]
  pub errors: Vec<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_users_listing() {
    let json = r#"{
      "found": 37,
      "users": [
        {
          "ID": 7,
          "login": "alice",
          "name": "Alice Liddell",
          "first_name": "Alice",
          "last_name": "Liddell",
          "email": "alice@example.com",
          "avatar_URL": "https://gravatar.example/alice",
          "roles": ["editor"],
          "is_super_admin": false
        }
      ]
    }"#;

    let resp: ListResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.found, 37);
    assert_eq!(resp.people.len(), 1);

    let person = resp.people.into_iter().next().unwrap()
      .into_remote_person(PersonKind::User);
    assert_eq!(person.user_id, 7);
    assert_eq!(person.role, Some(Role::Editor));
    assert_eq!(person.avatar_url.as_deref(), Some("https://gravatar.example/alice"));
  }

  #[test]
  fn decode_followers_listing_without_roles() {
    let json = r#"{
      "found": 2,
      "followers": [
        { "ID": 11, "login": "bob", "name": "Bob" },
        { "ID": 12, "login": "carol", "name": "Carol" }
      ]
    }"#;

    let resp: ListResponse = serde_json::from_str(json).unwrap();
    let people: Vec<RemotePerson> = resp
      .people
      .into_iter()
      .map(|dto| dto.into_remote_person(PersonKind::Follower))
      .collect();

    assert_eq!(people.len(), 2);
    assert!(people.iter().all(|p| p.role.is_none()));
    assert!(people.iter().all(|p| p.kind == PersonKind::Follower));
  }

  #[test]
  fn follower_roles_are_ignored_even_if_present() {
    let json = r#"{ "ID": 3, "login": "eve", "roles": ["editor"] }"#;
    let dto: PersonDto = serde_json::from_str(json).unwrap();
    let person = dto.into_remote_person(PersonKind::Follower);
    assert!(person.role.is_none());
  }

  #[test]
  fn decode_roles_response() {
    let json = r#"{
      "roles": [
        { "name": "administrator", "display_name": "Administrator" },
        { "name": "shop_manager", "display_name": "Shop Manager" }
      ]
    }"#;

    let resp: RolesResponse = serde_json::from_str(json).unwrap();
    let defs: Vec<RoleDefinition> =
      resp.roles.into_iter().map(RoleDto::into_definition).collect();

    assert_eq!(defs[0].slug, Role::Administrator);
    assert_eq!(defs[1].slug, Role::Custom("shop_manager".to_string()));
    assert_eq!(defs[1].name, "Shop Manager");
  }

  #[test]
  fn decode_invite_response_with_errors() {
    let json = r#"{ "errors": ["user is already a member"] }"#;
    let resp: InviteResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.errors.len(), 1);

    let empty: InviteResponse = serde_json::from_str("{}").unwrap();
    assert!(empty.errors.is_empty());
  }
}
