//! [`User`]-related [`Database`] implementations.

use common::operations::Update;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::User,
    infra::{
        database::{
            self,
            postgres::{Connection, Schema, Table},
            Postgres,
        },
        Database,
    },
    read::user::Field,
};

impl Schema for Field {
    const TABLE: &'static str = "users";

    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Name => "name",
            Self::Email => "email",
            Self::Status => "status",
        }
    }
}

impl Table for User {
    const COLUMNS: &'static str = "id, name, email, status, created_at";

    fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            status: row.get("status"),
            created_at: row.get("created_at"),
        }
    }
}

impl<C> Database<Update<User>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            name,
            email,
            status,
            created_at,
        } = user;

        const SQL: &str = "\
            INSERT INTO users (id, name, email, status, created_at) \
            VALUES (\
                $1::VARCHAR, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::INT2, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at";
        self.exec(SQL, &[&id, &name, &email, &status, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
