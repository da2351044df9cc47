//! [`Lesson`]-related [`Database`] implementations.

use tokio_postgres::Row;

use crate::{
    domain::Lesson,
    infra::database::postgres::{Schema, Table},
    read::lesson::Field,
};

#[cfg(doc)]
use crate::infra::Database;

impl Schema for Field {
    const TABLE: &'static str = "lessons";

    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Status => "status",
        }
    }
}

impl Table for Lesson {
    const COLUMNS: &'static str =
        "id, title, description, category, status, created_at";

    fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            category: row.get("category"),
            status: row.get("status"),
            created_at: row.get("created_at"),
        }
    }
}
