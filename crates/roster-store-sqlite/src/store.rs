//! [`SqlitePersonStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  person::{NewPerson, Person, PersonKind},
  role::{Role, RoleDefinition},
  store::{PersonQuery, PersonStore},
};

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, RawPerson, encode_dt, encode_kind, encode_role},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqlitePersonStore {
  conn: tokio_rusqlite::Connection,
}

impl SqlitePersonStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write a full row. `replace` controls INSERT vs INSERT OR REPLACE.
  async fn write_person_row(&self, person: Person, replace: bool) -> Result<()> {
    let kind_str       = encode_kind(person.kind).to_owned();
    let role_str       = person.role.as_ref().map(encode_role);
    let created_at_str = encode_dt(person.created_at);

    self
      .conn
      .call(move |conn| {
        let verb = if replace { "INSERT OR REPLACE" } else { "INSERT" };
        conn.execute(
          &format!(
            "{verb} INTO people (
               site_id, user_id, kind, login, display_name,
               first_name, last_name, email, avatar_url, role,
               is_super_admin, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
          ),
          rusqlite::params![
            person.site_id,
            person.user_id,
            kind_str,
            person.login,
            person.display_name,
            person.first_name,
            person.last_name,
            person.email,
            person.avatar_url,
            role_str,
            person.is_super_admin,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqlitePersonStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> Result<Option<Person>> {
    let kind_str = encode_kind(kind).to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {PERSON_COLUMNS} FROM people
               WHERE site_id = ?1 AND user_id = ?2 AND kind = ?3"
            ),
            rusqlite::params![site_id, user_id, kind_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self, query: PersonQuery) -> Result<Vec<Person>> {
    let kind_str   = query.kind.map(encode_kind).map(str::to_owned);
    let pattern    = query.search.as_deref().map(|s| format!("%{s}%"));
    let limit_val  = query.limit.unwrap_or(100) as i64;
    let offset_val = query.offset.unwrap_or(0) as i64;
    let site_id    = query.site_id;

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec!["site_id = ?1"];
        if kind_str.is_some() {
          conds.push("kind = ?2");
        }
        if pattern.is_some() {
          conds.push("(login LIKE ?3 OR display_name LIKE ?3)");
        }

        let sql = format!(
          "SELECT {PERSON_COLUMNS} FROM people
           WHERE {}
           ORDER BY display_name COLLATE NOCASE
           LIMIT ?4 OFFSET ?5",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              site_id,
              kind_str.as_deref(),
              pattern.as_deref(),
              limit_val,
              offset_val,
            ],
            RawPerson::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn insert_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      site_id:        input.site_id,
      user_id:        input.user_id,
      kind:           input.kind,
      login:          input.login,
      display_name:   input.display_name,
      first_name:     input.first_name,
      last_name:      input.last_name,
      email:          input.email,
      avatar_url:     input.avatar_url,
      role:           input.role,
      is_super_admin: input.is_super_admin,
      created_at:     Utc::now(),
    };

    let existing = self.person(person.site_id, person.user_id, person.kind).await?;
    if existing.is_some() {
      return Err(Error::DuplicatePerson {
        site_id: person.site_id,
        user_id: person.user_id,
        kind:    person.kind,
      });
    }

    self.write_person_row(person.clone(), false).await?;
    Ok(person)
  }

  async fn update_person(&self, person: Person) -> Result<Person> {
    let kind_str = encode_kind(person.kind).to_owned();
    let role_str = person.role.as_ref().map(encode_role);
    let to_store = person.clone();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET
             login = ?4, display_name = ?5, first_name = ?6, last_name = ?7,
             email = ?8, avatar_url = ?9, role = ?10, is_super_admin = ?11
           WHERE site_id = ?1 AND user_id = ?2 AND kind = ?3",
          rusqlite::params![
            to_store.site_id,
            to_store.user_id,
            kind_str,
            to_store.login,
            to_store.display_name,
            to_store.first_name,
            to_store.last_name,
            to_store.email,
            to_store.avatar_url,
            role_str,
            to_store.is_super_admin,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound {
        site_id: person.site_id,
        user_id: person.user_id,
        kind:    person.kind,
      });
    }
    Ok(person)
  }

  async fn restore_person(&self, person: Person) -> Result<()> {
    // OR REPLACE: a rollback snapshot wins over anything written to the key
    // since the delete.
    self.write_person_row(person, true).await
  }

  async fn delete_person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> Result<bool> {
    let kind_str = encode_kind(kind).to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE site_id = ?1 AND user_id = ?2 AND kind = ?3",
          rusqlite::params![site_id, user_id, kind_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn retain_people(
    &self,
    site_id: i64,
    kind: PersonKind,
    keep: Vec<i64>,
  ) -> Result<usize> {
    let kind_str = encode_kind(kind).to_owned();

    let removed: usize = self
      .conn
      .call(move |conn| {
        use rusqlite::types::Value;

        let placeholders = keep.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = if keep.is_empty() {
          "DELETE FROM people WHERE site_id = ?1 AND kind = ?2".to_string()
        } else {
          format!(
            "DELETE FROM people
             WHERE site_id = ?1 AND kind = ?2 AND user_id NOT IN ({placeholders})"
          )
        };

        let mut values: Vec<Value> =
          vec![Value::Integer(site_id), Value::Text(kind_str)];
        values.extend(keep.into_iter().map(Value::Integer));

        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;

    Ok(removed)
  }

  // ── Role cache ────────────────────────────────────────────────────────────

  async fn save_roles(&self, site_id: i64, roles: Vec<RoleDefinition>) -> Result<()> {
    let encoded: Vec<(String, String)> = roles
      .into_iter()
      .map(|def| (encode_role(&def.slug), def.name))
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM roles WHERE site_id = ?1", rusqlite::params![site_id])?;
        for (slug, name) in &encoded {
          tx.execute(
            "INSERT INTO roles (site_id, slug, name) VALUES (?1, ?2, ?3)",
            rusqlite::params![site_id, slug, name],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn roles(&self, site_id: i64) -> Result<Vec<RoleDefinition>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT slug, name FROM roles WHERE site_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![site_id], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(slug, name)| RoleDefinition { slug: Role::from_slug(&slug), name })
        .collect(),
    )
  }
}
