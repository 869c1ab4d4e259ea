//! Catalog workflows, one service per entity type plus the home page

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod home;
pub mod relations;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub home: home::HomeService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(repository: Repository) -> Self {
        let relations = relations::RelationResolver::new(repository.clone());
        Self {
            home: home::HomeService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone(), relations.clone()),
            genres: genres::GenresService::new(repository.clone(), relations.clone()),
            books: books::BooksService::new(repository.clone(), relations),
            book_instances: book_instances::BookInstancesService::new(repository),
        }
    }
}
