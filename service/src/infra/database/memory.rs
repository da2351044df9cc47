//! In-memory [`Database`] implementation.

use std::sync::Arc;

use common::{
    listing::{Field, Filter, Listable},
    operations::{By, Select, Update},
    Descriptor, Page,
};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{Lesson, User},
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] running the listing engines directly over its
/// entities.
///
/// Every read works on a snapshot cloned under a read lock.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`User`]s.
    users: Collection<User>,

    /// Stored [`Lesson`]s.
    lessons: Collection<Lesson>,
}

impl Memory {
    /// Creates a new [`Memory`] holding the provided entities.
    #[must_use]
    pub fn new(
        users: impl IntoIterator<Item = User>,
        lessons: impl IntoIterator<Item = Lesson>,
    ) -> Self {
        Self {
            users: Collection(Arc::new(RwLock::new(
                users.into_iter().collect(),
            ))),
            lessons: Collection(Arc::new(RwLock::new(
                lessons.into_iter().collect(),
            ))),
        }
    }
}

/// Shared collection of entities.
#[derive(Debug)]
pub struct Collection<E>(Arc<RwLock<Vec<E>>>);

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self(Arc::default())
    }
}

impl<E: Listable> Collection<E> {
    /// Clones the entities satisfying the provided [`Filter`].
    async fn select(&self, filter: &Filter<E::Field>) -> Vec<E> {
        self.0
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(*e))
            .cloned()
            .collect()
    }
}

/// Access to the [`Collection`] of entities listed by `F`ields.
pub trait Holds<F> {
    /// Entities listed by `F`ields.
    type Entity: Listable<Field = F>;

    /// Returns the [`Collection`] of entities.
    fn collection(&self) -> &Collection<Self::Entity>;
}

impl Holds<read::user::Field> for Memory {
    type Entity = User;

    fn collection(&self) -> &Collection<User> {
        &self.users
    }
}

impl Holds<read::lesson::Field> for Memory {
    type Entity = Lesson;

    fn collection(&self) -> &Collection<Lesson> {
        &self.lessons
    }
}

impl<E> Database<Select<By<Page<E>, Descriptor<E::Field>>>> for Memory
where
    E: Listable,
    Self: Holds<E::Field, Entity = E>,
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

        let mut matching =
            <Self as Holds<E::Field>>::collection(self).select(&filter).await;
        sorting.sort(&mut matching);

        Ok(Page::paginate(&arguments, &sorting, &matching))
    }
}

impl<F> Database<Select<By<u64, Filter<F>>>> for Memory
where
    F: Field,
    Self: Holds<F>,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<u64, Filter<F>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let entities = <Self as Holds<F>>::collection(self).0.read().await;
        let count = filter.count(entities.iter());

        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

impl<E, Id> Database<Select<By<Option<E>, Id>>> for Memory
where
    E: Listable,
    Id: AsRef<str> + Send,
    Self: Holds<E::Field, Entity = E>,
{
    type Ok = Option<E>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<E>, Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        Ok(<Self as Holds<E::Field>>::collection(self)
            .0
            .read()
            .await
            .iter()
            .find(|e| e.id() == id.as_ref())
            .cloned())
    }
}

impl<E> Database<Update<E>> for Memory
where
    E: Listable,
    Self: Holds<E::Field, Entity = E>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(entity): Update<E>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut entities =
            <Self as Holds<E::Field>>::collection(self).0.write().await;
        match entities.iter().position(|e| e.id() == entity.id()) {
            Some(i) => entities[i] = entity,
            None => entities.push(entity),
        }
        Ok(())
    }
}
