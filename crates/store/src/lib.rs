//! SQLite data-access layer for teams and their members.
//!
//! Every operation opens its own connection and drops it before returning.
//! There are no transactions across operations; SQLite's autocommit and
//! single-writer locking are the only isolation.

mod sql;

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

use teamroster_api::db::{self, migrations::MIGRATIONS, migrations::MIGRATIONS_TABLE};
use teamroster_api::{ServiceError, Team, TeamDetailResponse, TeamMember, service};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the teams database. Holds only the file path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open (or create) the database at `path` and apply pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir for {}", path.display()))?;
        }
        let conn =
            Connection::open(&path).with_context(|| format!("open db {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, ServiceError> {
        let conn = Connection::open(&self.path).map_err(ServiceError::from_db("open db"))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(ServiceError::from_db("set busy timeout"))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(ServiceError::from_db("enable foreign keys"))?;
        Ok(conn)
    }

    // ── Teams ──────────────────────────────────────────────────────────

    /// All teams, sorted by name.
    pub fn list_teams(&self) -> Result<Vec<Team>, ServiceError> {
        let conn = self.connect()?;
        sql::query_all(&conn, &db::teams::list(), team_from_row)
            .map_err(ServiceError::from_db("list teams"))
    }

    pub fn get_team(&self, id: i64) -> Result<Option<Team>, ServiceError> {
        let conn = self.connect()?;
        fetch_team(&conn, id)
    }

    /// A team with its members, or `NotFound`.
    pub fn team_detail(&self, id: i64) -> Result<TeamDetailResponse, ServiceError> {
        let conn = self.connect()?;
        let team = fetch_team(&conn, id)?.ok_or_else(ServiceError::team_not_found)?;
        let members = fetch_members(&conn, id)?;
        Ok(TeamDetailResponse { team, members })
    }

    /// Create a team. Names are unique; a duplicate yields `Conflict`.
    pub fn create_team(&self, name: &str) -> Result<Team, ServiceError> {
        let name = service::validate_team_name(name)?;
        let conn = self.connect()?;

        let taken = sql::count(&conn, &db::teams::name_taken(&name))
            .map_err(ServiceError::from_db("check team name"))?;
        if taken > 0 {
            return Err(team_exists());
        }

        sql::execute(&conn, &db::teams::insert(&name)).map_err(|e| {
            if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
                team_exists()
            } else {
                ServiceError::from_db("insert team")(e)
            }
        })?;
        let id = conn.last_insert_rowid();
        tracing::debug!(team_id = id, name = %name, "team created");

        fetch_team(&conn, id)?
            .ok_or_else(|| ServiceError::Internal(format!("team {id} vanished after insert")))
    }

    /// Delete a team and, through the foreign key cascade, all its members.
    pub fn delete_team(&self, id: i64) -> Result<(), ServiceError> {
        let conn = self.connect()?;
        let affected = sql::execute(&conn, &db::teams::delete(id))
            .map_err(ServiceError::from_db("delete team"))?;
        if affected == 0 {
            return Err(ServiceError::team_not_found());
        }
        tracing::debug!(team_id = id, "team deleted");
        Ok(())
    }

    // ── Members ────────────────────────────────────────────────────────

    /// Members of a team, sorted by name. An unknown team simply has none.
    pub fn list_members(&self, team_id: i64) -> Result<Vec<TeamMember>, ServiceError> {
        let conn = self.connect()?;
        fetch_members(&conn, team_id)
    }

    /// Add a member to an existing team.
    pub fn create_member(
        &self,
        team_id: i64,
        name: &str,
        role: Option<&str>,
    ) -> Result<TeamMember, ServiceError> {
        let conn = self.connect()?;

        // An unknown team wins over invalid input.
        let exists = sql::count(&conn, &db::teams::exists(team_id))
            .map_err(ServiceError::from_db("check team"))?;
        if exists == 0 {
            return Err(ServiceError::team_not_found());
        }

        let name = service::validate_member_name(name)?;
        let role = service::normalize_role(role);

        sql::execute(
            &conn,
            &db::members::insert(team_id, &name, role.as_deref()),
        )
        .map_err(|e| {
            // The team was deleted between the check and the insert.
            if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                ServiceError::team_not_found()
            } else {
                ServiceError::from_db("insert member")(e)
            }
        })?;
        let id = conn.last_insert_rowid();
        tracing::debug!(member_id = id, team_id, "member created");

        sql::query_opt(&conn, &db::members::get_by_id(id), member_from_row)
            .map_err(ServiceError::from_db("load member"))?
            .ok_or_else(|| ServiceError::Internal(format!("member {id} vanished after insert")))
    }

    /// Remove a member. Returns the id of the team it belonged to.
    pub fn delete_member(&self, member_id: i64) -> Result<i64, ServiceError> {
        let conn = self.connect()?;

        let team_id: i64 = sql::query_opt(&conn, &db::members::team_of(member_id), |row| {
            row.get(0)
        })
        .map_err(ServiceError::from_db("resolve member team"))?
        .ok_or_else(ServiceError::member_not_found)?;

        let affected = sql::execute(&conn, &db::members::delete(member_id))
            .map_err(ServiceError::from_db("delete member"))?;
        if affected == 0 {
            return Err(ServiceError::member_not_found());
        }
        tracing::debug!(member_id, team_id, "member deleted");
        Ok(team_id)
    }
}

fn team_exists() -> ServiceError {
    ServiceError::Conflict("Team already exists".into())
}

fn is_constraint(err: &rusqlite::Error, extended: i32) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation && e.extended_code == extended
    )
}

fn fetch_team(conn: &Connection, id: i64) -> Result<Option<Team>, ServiceError> {
    sql::query_opt(conn, &db::teams::get_by_id(id), team_from_row)
        .map_err(ServiceError::from_db("load team"))
}

fn fetch_members(conn: &Connection, team_id: i64) -> Result<Vec<TeamMember>, ServiceError> {
    sql::query_all(conn, &db::members::list(team_id), member_from_row)
        .map_err(ServiceError::from_db("list members"))
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATIONS_TABLE)?;

    for (name, migration) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .with_context(|| format!("checking migration {name}"))?;

        if !already_applied {
            conn.execute_batch(migration)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Store {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.keep().join("teams.db");
        Store::open(&path).unwrap()
    }

    fn count_rows(store: &Store, table: &str) -> i64 {
        let conn = store.connect().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_open_and_schema() {
        let store = test_store();
        assert!(store.list_teams().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_does_not_rerun_migrations() {
        let store = test_store();
        store.create_team("Alpha").unwrap();
        let reopened = Store::open(store.path()).unwrap();
        assert_eq!(reopened.list_teams().unwrap().len(), 1);
        assert_eq!(count_rows(&reopened, "_migrations"), MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_create_team_lists_sorted_by_name() {
        let store = test_store();
        store.create_team("Zulu").unwrap();
        let alpha = store.create_team("Alpha").unwrap();
        store.create_team("Mike").unwrap();

        assert_eq!(alpha.name, "Alpha");
        assert!(!alpha.created_at.is_empty());

        let names: Vec<String> = store
            .list_teams()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn test_create_team_trims_name() {
        let store = test_store();
        let team = store.create_team("  Alpha ").unwrap();
        assert_eq!(team.name, "Alpha");
    }

    #[test]
    fn test_duplicate_team_is_conflict() {
        let store = test_store();
        store.create_team("Alpha").unwrap();

        let err = store.create_team("Alpha").unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // Trimming happens before the uniqueness check
        let err = store.create_team(" Alpha ").unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        assert_eq!(store.list_teams().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_team_name_is_rejected() {
        let store = test_store();
        let err = store.create_team("   ").unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert_eq!(count_rows(&store, "teams"), 0);
    }

    #[test]
    fn test_long_team_name_is_accepted() {
        let store = test_store();
        let name = "x".repeat(200);
        let team = store.create_team(&name).unwrap();
        assert_eq!(team.name, name);

        let teams = store.list_teams().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, name);
    }

    #[test]
    fn test_get_team() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        assert_eq!(store.get_team(team.id).unwrap(), Some(team));
        assert_eq!(store.get_team(9999).unwrap(), None);
    }

    #[test]
    fn test_create_member_and_list_sorted() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();

        let bob = store.create_member(team.id, "Bob", Some("Lead")).unwrap();
        store.create_member(team.id, "Alice", None).unwrap();

        assert_eq!(bob.team_id, team.id);
        assert_eq!(bob.role.as_deref(), Some("Lead"));

        let members = store.list_members(team.id).unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(members[0].role, None);
    }

    #[test]
    fn test_blank_role_is_stored_as_null() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        let member = store.create_member(team.id, "Bob", Some("  ")).unwrap();
        assert_eq!(member.role, None);
    }

    #[test]
    fn test_members_are_scoped_to_their_team() {
        let store = test_store();
        let alpha = store.create_team("Alpha").unwrap();
        let beta = store.create_team("Beta").unwrap();
        store.create_member(alpha.id, "Bob", None).unwrap();
        store.create_member(beta.id, "Carol", None).unwrap();

        let alpha_members = store.list_members(alpha.id).unwrap();
        assert_eq!(alpha_members.len(), 1);
        assert_eq!(alpha_members[0].name, "Bob");
    }

    #[test]
    fn test_create_member_unknown_team_is_not_found() {
        let store = test_store();
        let err = store.create_member(42, "Bob", Some("Lead")).unwrap_err();
        assert_eq!(err, ServiceError::team_not_found());
        assert_eq!(count_rows(&store, "team_members"), 0);
    }

    #[test]
    fn test_unknown_team_takes_precedence_over_blank_member_name() {
        let store = test_store();
        let err = store.create_member(42, "  ", None).unwrap_err();
        assert_eq!(err, ServiceError::team_not_found());

        let alpha = store.create_team("Alpha").unwrap();
        let err = store.create_member(alpha.id, "  ", None).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert_eq!(count_rows(&store, "team_members"), 0);
    }

    #[test]
    fn test_delete_member_returns_owning_team() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        let bob = store.create_member(team.id, "Bob", Some("Lead")).unwrap();
        let alice = store.create_member(team.id, "Alice", None).unwrap();

        assert_eq!(store.delete_member(bob.id).unwrap(), team.id);

        let members = store.list_members(team.id).unwrap();
        assert_eq!(members, vec![alice]);
    }

    #[test]
    fn test_delete_unknown_member_mutates_nothing() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        store.create_member(team.id, "Bob", None).unwrap();

        let err = store.delete_member(9999).unwrap_err();
        assert_eq!(err, ServiceError::member_not_found());
        assert_eq!(count_rows(&store, "team_members"), 1);
    }

    #[test]
    fn test_delete_member_twice() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        let bob = store.create_member(team.id, "Bob", None).unwrap();
        store.delete_member(bob.id).unwrap();
        assert!(matches!(
            store.delete_member(bob.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_team_detail() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        store.create_member(team.id, "Bob", Some("Lead")).unwrap();

        let detail = store.team_detail(team.id).unwrap();
        assert_eq!(detail.team, team);
        assert_eq!(detail.members.len(), 1);

        assert_eq!(
            store.team_detail(9999).unwrap_err(),
            ServiceError::team_not_found()
        );
    }

    #[test]
    fn test_delete_team_cascades_to_members() {
        let store = test_store();
        let alpha = store.create_team("Alpha").unwrap();
        let beta = store.create_team("Beta").unwrap();
        store.create_member(alpha.id, "Bob", None).unwrap();
        store.create_member(alpha.id, "Alice", None).unwrap();
        store.create_member(beta.id, "Carol", None).unwrap();

        store.delete_team(alpha.id).unwrap();

        assert_eq!(store.get_team(alpha.id).unwrap(), None);
        assert!(store.list_members(alpha.id).unwrap().is_empty());
        assert_eq!(count_rows(&store, "team_members"), 1);
        assert_eq!(
            store.delete_team(alpha.id).unwrap_err(),
            ServiceError::team_not_found()
        );
    }

    #[test]
    fn test_deleted_team_name_can_be_reused() {
        let store = test_store();
        let team = store.create_team("Alpha").unwrap();
        store.delete_team(team.id).unwrap();
        let again = store.create_team("Alpha").unwrap();
        assert_ne!(again.id, team.id);
    }

    #[test]
    fn test_schema_rejects_orphan_members() {
        let store = test_store();
        let conn = store.connect().unwrap();
        let err = sql::execute(&conn, &db::members::insert(77, "Ghost", None)).unwrap_err();
        assert!(is_constraint(
            &err,
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        ));
    }

    #[test]
    fn test_schema_enforces_unique_names() {
        let store = test_store();
        store.create_team("Alpha").unwrap();
        let conn = store.connect().unwrap();
        let err = sql::execute(&conn, &db::teams::insert("Alpha")).unwrap_err();
        assert!(is_constraint(&err, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE));
    }
}
