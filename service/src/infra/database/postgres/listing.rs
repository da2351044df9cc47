//! SQL rendition of listing queries.

use common::listing::{
    Anchor, Criterion, Field, Filter, Kind, Listable, Match, Order, Sorting,
    Value,
};
use itertools::Itertools as _;
use tokio_postgres::{types::ToSql, Row};

use super::LikePattern;

/// Mapping of a listing [`Field`] onto a Postgres table column.
pub trait Schema: Field {
    /// Name of the table storing entities with this [`Field`].
    const TABLE: &'static str;

    /// Returns name of the column storing this [`Field`].
    fn column(self) -> &'static str;
}

/// [`Listable`] entity stored in a Postgres table.
///
/// The table must have a textual `id` column.
pub trait Table: Listable<Field: Schema> {
    /// Comma-separated columns to select for building an entity.
    const COLUMNS: &'static str;

    /// Builds an entity from the provided [`Row`] of selected
    /// [`Table::COLUMNS`].
    fn from_row(row: &Row) -> Self;
}

/// SQL statement parameters being collected while rendering its clauses.
#[derive(Debug, Default)]
pub(crate) struct Params(Vec<Value>);

impl Params {
    /// Binds the provided [`Value`], returning its typed placeholder.
    pub(crate) fn bind(&mut self, value: Value) -> String {
        let ty = match value.kind() {
            Kind::Text => "VARCHAR",
            Kind::Integer => "INT8",
            Kind::Timestamp => "TIMESTAMPTZ",
        };
        self.0.push(value);
        format!("${}::{ty}", self.0.len())
    }

    /// Returns the bound parameters in the order of their placeholders.
    pub(crate) fn as_sql(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.0.iter().map(|v| -> &(dyn ToSql + Sync) { v }).collect()
    }
}

/// Returns SQL expression ordering the provided [`Field`] the same way its
/// [`Value`]s are ordered.
fn ordered<F: Schema>(field: F) -> String {
    match field.kind() {
        Kind::Text => format!(r#"{} COLLATE "C""#, field.column()),
        Kind::Integer | Kind::Timestamp => field.column().to_owned(),
    }
}

/// Renders `WHERE` clause of the provided [`Filter`], optionally narrowed to
/// the rows going after the provided [`Anchor`].
pub(crate) fn where_clause<F: Schema>(
    filter: &Filter<F>,
    after: Option<(&Sorting<F>, &Anchor)>,
    params: &mut Params,
) -> String {
    let mut conditions = Vec::new();

    if let Some(term) = &filter.search {
        let pattern =
            params.bind(Value::Text(LikePattern::containing(term).into()));
        conditions.push(format!(
            "({})",
            Filter::<F>::searchable()
                .map(|f| format!(
                    r"LOWER({}) LIKE LOWER({pattern}) ESCAPE '\'",
                    f.column(),
                ))
                .join(" OR "),
        ));
    }

    for Criterion { field, matches } in &filter.criteria {
        let column = ordered(*field);
        match matches {
            Match::Equals(v) => {
                conditions.push(format!("{column} = {}", params.bind(v.clone())));
            }
            Match::Range { min, max } => {
                if let Some(min) = min {
                    conditions.push(format!(
                        "{column} >= {}",
                        params.bind(min.clone()),
                    ));
                }
                if let Some(max) = max {
                    conditions.push(format!(
                        "{column} <= {}",
                        params.bind(max.clone()),
                    ));
                }
            }
        }
    }

    if let Some((sorting, anchor)) = after {
        let column = ordered(sorting.field);
        let cmp = match sorting.order {
            Order::Ascending => ">",
            Order::Descending => "<",
        };
        let value = params.bind(anchor.value.clone());
        let id = params.bind(Value::Text(anchor.id.clone()));
        conditions.push(format!(
            r#"({column} {cmp} {value} OR ({column} = {value} AND id COLLATE "C" > {id}))"#,
        ));
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Renders `ORDER BY` clause of the provided [`Sorting`].
pub(crate) fn order_by_clause<F: Schema>(sorting: &Sorting<F>) -> String {
    format!(
        r#"ORDER BY {} {}, id COLLATE "C" ASC"#,
        ordered(sorting.field),
        sorting.order.sql(),
    )
}
