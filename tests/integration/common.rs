//! Shared fixtures

use std::sync::Arc;

use catalog_server::{
    models::{Author, AuthorFields, Book, BookFields, Genre, GenreFields},
    repository::{CatalogStore, MemoryRepository},
    services::Services,
    validation::RawFields,
    views::Outcome,
};
use uuid::Uuid;

pub struct Catalog {
    pub store: Arc<MemoryRepository>,
    pub services: Services,
}

pub fn catalog() -> Catalog {
    let store = Arc::new(MemoryRepository::new());
    let services = Services::new(store.clone());
    Catalog { store, services }
}

pub fn form(pairs: &[(&str, &str)]) -> RawFields {
    pairs.iter().copied().collect()
}

/// Id at the end of a redirect target
pub fn redirected_id(outcome: &Outcome) -> Uuid {
    let target = outcome.redirect_target().expect("expected a redirect");
    let id = target.rsplit('/').next().expect("empty redirect target");
    Uuid::parse_str(id).expect("redirect does not end with an id")
}

impl Catalog {
    pub async fn author(&self, first_name: &str, family_name: &str) -> Author {
        self.store
            .authors_save(AuthorFields {
                first_name: first_name.into(),
                family_name: family_name.into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap()
    }

    pub async fn genre(&self, name: &str) -> Genre {
        self.store
            .genres_save(GenreFields { name: name.into() })
            .await
            .unwrap()
    }

    pub async fn book(&self, title: &str, author: Uuid, genre: Vec<Uuid>) -> Book {
        self.store
            .books_save(BookFields {
                title: title.into(),
                author,
                summary: "A summary".into(),
                isbn: "9780000000000".into(),
                genre,
            })
            .await
            .unwrap()
    }
}
