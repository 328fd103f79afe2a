//! Team query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::Teams;

/// Column list for team SELECT queries, in [`crate::Team`] field order.
fn team_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column((Teams::Table, Teams::Id))
        .column((Teams::Table, Teams::Name))
        .column((Teams::Table, Teams::CreatedAt))
}

/// INSERT a new team. The id and timestamp come from the schema defaults.
pub fn insert(name: &str) -> Built {
    Query::insert()
        .into_table(Teams::Table)
        .columns([Teams::Name])
        .values_panic([name.into()])
        .build(SqliteQueryBuilder)
}

/// SELECT a single team by id.
pub fn get_by_id(id: i64) -> Built {
    let mut q = Query::select().to_owned();
    team_columns(&mut q);
    q.from(Teams::Table)
        .and_where(Expr::col((Teams::Table, Teams::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// List all teams, ordered by name.
pub fn list() -> Built {
    let mut q = Query::select().to_owned();
    team_columns(&mut q);
    q.from(Teams::Table)
        .order_by((Teams::Table, Teams::Name), Order::Asc)
        .order_by((Teams::Table, Teams::Id), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Check if a team exists.
pub fn exists(id: i64) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Teams::Table)
        .and_where(Expr::col(Teams::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Check if a team with this exact name exists.
pub fn name_taken(name: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Teams::Table)
        .and_where(Expr::col(Teams::Name).eq(name))
        .build(SqliteQueryBuilder)
}

/// DELETE a team. Members go with it via `ON DELETE CASCADE`.
pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(Teams::Table)
        .and_where(Expr::col(Teams::Id).eq(id))
        .build(SqliteQueryBuilder)
}
