//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]

mod lesson;
mod user;

use common::{
    listing::Filter,
    operations::{By, Select},
    pagination::Arguments,
    Descriptor, Page,
};
use postgres_types::ToSql;
use tracerr::Traced;

use crate::infra::{
    database::{
        self,
        postgres::{
            listing::{order_by_clause, where_clause, Params},
            Connection, Schema, Table,
        },
        Postgres,
    },
    Database,
};

impl<C, E> Database<Select<By<Page<E>, Descriptor<E::Field>>>> for Postgres<C>
where
    C: Connection + Sync,
    E: Table,
{
    type Ok = Page<E>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<E>, Descriptor<E::Field>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Descriptor {
            filter,
            sorting,
            arguments,
        } = by.into_inner();

        let Some(offset) =
            arguments.offset().and_then(|o| i64::try_from(o).ok())
        else {
            return Ok(Page::from_lookahead(&arguments, &sorting, Vec::new()));
        };
        // One more row tells whether the next page exists.
        let lookahead =
            i64::try_from(arguments.limit().saturating_add(1)).unwrap_or(i64::MAX);

        let after = match &arguments {
            Arguments::Cursor { after, .. } => {
                after.as_ref().map(|anchor| (&sorting, anchor))
            }
            Arguments::Offset { .. } => None,
        };
        let mut params = Params::default();
        let filter = where_clause(&filter, after, &mut params);
        let limit = params.bind(lookahead.into());
        let offset = params.bind(offset.into());
        let sql = format!(
            "SELECT {} FROM {} {filter} {} LIMIT {limit} OFFSET {offset}",
            E::COLUMNS,
            <E::Field as Schema>::TABLE,
            order_by_clause(&sorting),
        );

        let items = self
            .query(sql.as_str(), &params.as_sql())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(E::from_row)
            .collect();
        Ok(Page::from_lookahead(&arguments, &sorting, items))
    }
}

impl<C, F> Database<Select<By<u64, Filter<F>>>> for Postgres<C>
where
    C: Connection + Sync,
    F: Schema,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<u64, Filter<F>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();

        let mut params = Params::default();
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} {}",
            F::TABLE,
            where_clause(&filter, None, &mut params),
        );

        let count: i64 = self
            .query_opt(sql.as_str(), &params.as_sql())
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get("count"));
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

impl<C, E, Id> Database<Select<By<Option<E>, Id>>> for Postgres<C>
where
    C: Connection + Sync,
    E: Table,
    Id: ToSql + Send + Sync,
{
    type Ok = Option<E>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<E>, Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1::VARCHAR",
            E::COLUMNS,
            <E::Field as Schema>::TABLE,
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(E::from_row))
    }
}
