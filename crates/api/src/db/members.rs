//! Team member query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::TeamMembers;

fn member_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column((TeamMembers::Table, TeamMembers::Id))
        .column((TeamMembers::Table, TeamMembers::TeamId))
        .column((TeamMembers::Table, TeamMembers::Name))
        .column((TeamMembers::Table, TeamMembers::Role))
        .column((TeamMembers::Table, TeamMembers::CreatedAt))
}

/// INSERT a team member.
pub fn insert(team_id: i64, name: &str, role: Option<&str>) -> Built {
    Query::insert()
        .into_table(TeamMembers::Table)
        .columns([TeamMembers::TeamId, TeamMembers::Name, TeamMembers::Role])
        .values_panic([
            team_id.into(),
            name.into(),
            role.map(|r| r.to_string()).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a single member by id.
pub fn get_by_id(id: i64) -> Built {
    let mut q = Query::select().to_owned();
    member_columns(&mut q);
    q.from(TeamMembers::Table)
        .and_where(Expr::col((TeamMembers::Table, TeamMembers::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// List members of a team, ordered by name.
pub fn list(team_id: i64) -> Built {
    let mut q = Query::select().to_owned();
    member_columns(&mut q);
    q.from(TeamMembers::Table)
        .and_where(Expr::col((TeamMembers::Table, TeamMembers::TeamId)).eq(team_id))
        .order_by((TeamMembers::Table, TeamMembers::Name), Order::Asc)
        .order_by((TeamMembers::Table, TeamMembers::Id), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Resolve the team a member belongs to.
pub fn team_of(id: i64) -> Built {
    Query::select()
        .column(TeamMembers::TeamId)
        .from(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// DELETE a team member by id.
pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::Id).eq(id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_scoped_and_sorted() {
        let (sql, values) = list(3);
        assert!(sql.contains(r#"WHERE "team_members"."team_id" = ?"#));
        assert!(sql.contains(r#"ORDER BY "team_members"."name" ASC"#));
        assert_eq!(values.0, vec![sea_query::Value::BigInt(Some(3))]);
    }

    #[test]
    fn test_insert_without_role_binds_null() {
        let (_, values) = insert(1, "Bob", None);
        assert_eq!(values.0.len(), 3);
        assert_eq!(values.0[2], sea_query::Value::String(None));
    }
}
