//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Teams {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
pub enum TeamMembers {
    Table,
    Id,
    TeamId,
    Name,
    Role,
    CreatedAt,
}
