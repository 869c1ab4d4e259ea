//! Catalog workflows end to end

use catalog_server::{
    error::AppError,
    models::{
        AuthorFilter, BookFilter, BookInstanceFields, BookInstanceFilter, BookInstanceStatus,
        GenreFilter,
    },
    repository::CatalogStore,
    services::genres::DUPLICATE_NAME,
    views::{Tally, View},
};
use uuid::Uuid;

use crate::common::{catalog, form, redirected_id};

#[tokio::test]
async fn test_create_author_redirects_to_new_author() {
    let catalog = catalog();

    let outcome = catalog
        .services
        .authors
        .create(&form(&[
            ("first_name", "Jane"),
            ("family_name", "Austen"),
            ("date_of_birth", "1775-12-16"),
        ]))
        .await
        .unwrap();

    let id = redirected_id(&outcome);
    assert_eq!(outcome.redirect_target(), Some(format!("/catalog/author/{}", id).as_str()));

    let author = catalog.store.authors_find_by_id(id).await.unwrap().unwrap();
    assert_eq!(author.family_name, "Austen");
    assert_eq!(author.date_of_birth.unwrap().to_string(), "1775-12-16");
}

#[tokio::test]
async fn test_invalid_author_is_not_persisted() {
    let catalog = catalog();

    let outcome = catalog
        .services
        .authors
        .create(&form(&[("first_name", "Jane"), ("family_name", "  ")]))
        .await
        .unwrap();

    let Some(View::AuthorForm(page)) = outcome.view() else {
        panic!("expected author form, got {:?}", outcome);
    };
    assert_eq!(page.errors.len(), 1);
    assert_eq!(page.errors[0].message, "Family name must be specified.");
    assert_eq!(page.author.as_ref().unwrap().first_name, "Jane");
    assert_eq!(catalog.store.authors_count(AuthorFilter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_date_is_reported() {
    let catalog = catalog();

    let outcome = catalog
        .services
        .authors
        .create(&form(&[
            ("first_name", "Jane"),
            ("family_name", "Austen"),
            ("date_of_death", "not a date"),
        ]))
        .await
        .unwrap();

    let Some(View::AuthorForm(page)) = outcome.view() else {
        panic!("expected author form");
    };
    assert_eq!(page.errors[0].field, "date_of_death");
    assert_eq!(page.errors[0].message, "Invalid date of death");
}

#[tokio::test]
async fn test_author_update_keeps_identity() {
    let catalog = catalog();
    let author = catalog.author("Mary", "Godwin").await;

    let outcome = catalog
        .services
        .authors
        .update(
            author.id,
            &form(&[
                ("first_name", "Mary"),
                ("family_name", "Shelley"),
                ("date_of_birth", "1797-08-30"),
                ("date_of_death", "1851-02-01"),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some(author.url().as_str()));

    let stored = catalog.store.authors_find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(stored.family_name, "Shelley");
    assert_eq!(stored.date_of_birth.unwrap().to_string(), "1797-08-30");
    assert_eq!(stored.date_of_death.unwrap().to_string(), "1851-02-01");
    assert_eq!(catalog.store.authors_count(AuthorFilter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_author_update_writes_nothing() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;

    let outcome = catalog
        .services
        .authors
        .update(author.id, &form(&[("first_name", "J@ne"), ("family_name", "Austen")]))
        .await
        .unwrap();

    let Some(View::AuthorForm(page)) = outcome.view() else {
        panic!("expected author form, got {:?}", outcome);
    };
    assert_eq!(page.title, "Update Author");
    assert_eq!(page.errors[0].message, "First name has non-alphanumeric characters.");

    let stored = catalog.store.authors_find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(stored, author);
}

#[tokio::test]
async fn test_genre_creation_is_idempotent_by_name() {
    let catalog = catalog();
    let genres = &catalog.services.genres;

    let first = genres.create(&form(&[("name", "Fantasy")])).await.unwrap();
    let second = genres.create(&form(&[("name", "Fantasy")])).await.unwrap();
    assert_eq!(first.redirect_target(), second.redirect_target());

    let scifi = genres.create(&form(&[("name", "Sci-Fi")])).await.unwrap();
    let again = genres.create(&form(&[("name", " Sci-Fi ")])).await.unwrap();
    assert_eq!(scifi.redirect_target(), again.redirect_target());

    assert_eq!(catalog.store.genres_count(GenreFilter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn test_genre_rename_onto_existing_name_is_rejected() {
    let catalog = catalog();
    catalog.genre("Fantasy").await;
    let poetry = catalog.genre("Poetry").await;

    let outcome = catalog
        .services
        .genres
        .update(poetry.id, &form(&[("name", "Fantasy")]))
        .await
        .unwrap();
    let Some(View::GenreForm(page)) = outcome.view() else {
        panic!("expected genre form");
    };
    assert_eq!(page.errors[0].message, DUPLICATE_NAME);

    // Keeping its own name is fine
    let outcome = catalog
        .services
        .genres
        .update(poetry.id, &form(&[("name", "Poetry")]))
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some(poetry.url().as_str()));
}

#[tokio::test]
async fn test_author_with_books_cannot_be_deleted() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;

    let outcome = catalog.services.authors.delete(author.id).await.unwrap();
    let Some(View::AuthorDelete(page)) = outcome.view() else {
        panic!("expected author delete page, got {:?}", outcome);
    };
    assert_eq!(page.author_books.len(), 1);
    assert_eq!(page.author_books[0].title, "Emma");
    assert!(catalog.store.authors_find_by_id(author.id).await.unwrap().is_some());

    catalog.store.books_delete_by_id(book.id).await.unwrap();

    let outcome = catalog.services.authors.delete(author.id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/authors"));
    assert!(catalog.store.authors_find_by_id(author.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_genre_in_use_cannot_be_deleted() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "LeGuin").await;
    let fantasy = catalog.genre("Fantasy").await;
    catalog.book("Earthsea", author.id, vec![fantasy.id]).await;

    let outcome = catalog.services.genres.delete(fantasy.id).await.unwrap();
    assert!(matches!(outcome.view(), Some(View::GenreDelete(_))));
    assert_eq!(catalog.store.genres_count(GenreFilter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_book_with_copies_cannot_be_deleted() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    let copy = catalog
        .store
        .book_instances_save(BookInstanceFields {
            book: book.id,
            imprint: "Penguin".into(),
            status: BookInstanceStatus::Available,
            due_back: None,
        })
        .await
        .unwrap();

    let outcome = catalog.services.books.delete(book.id).await.unwrap();
    let Some(View::BookDelete(page)) = outcome.view() else {
        panic!("expected book delete page");
    };
    assert_eq!(page.book_instances.len(), 1);

    let outcome = catalog.services.book_instances.delete(copy.id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/bookinstances"));

    let outcome = catalog.services.books.delete(book.id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/books"));
    assert_eq!(catalog.store.books_count(BookFilter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_book_update_keeps_identity() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    let copy = catalog
        .store
        .book_instances_save(BookInstanceFields {
            book: book.id,
            imprint: "Penguin".into(),
            status: BookInstanceStatus::Loaned,
            due_back: None,
        })
        .await
        .unwrap();
    let author_id = author.id.to_string();

    let outcome = catalog
        .services
        .books
        .update(
            book.id,
            &form(&[
                ("title", "Emma, Revised"),
                ("author", author_id.as_str()),
                ("summary", "Matchmaking"),
                ("isbn", "9780141439587"),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some(book.url().as_str()));

    let outcome = catalog.services.book_instances.detail(copy.id).await.unwrap();
    let Some(View::BookInstanceDetail(page)) = outcome.view() else {
        panic!("expected copy detail");
    };
    assert_eq!(page.title, "Copy: Emma, Revised");
    assert_eq!(page.bookinstance.book.as_ref().unwrap().id, book.id);
}

#[tokio::test]
async fn test_single_genre_value_becomes_one_element_set() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "LeGuin").await;
    let fantasy = catalog.genre("Fantasy").await;
    let (author_id, genre_id) = (author.id.to_string(), fantasy.id.to_string());

    let outcome = catalog
        .services
        .books
        .create(&form(&[
            ("title", "Earthsea"),
            ("author", author_id.as_str()),
            ("summary", "A wizard"),
            ("isbn", "9780547773742"),
            ("genre", genre_id.as_str()),
        ]))
        .await
        .unwrap();

    let book = catalog
        .store
        .books_find_by_id(redirected_id(&outcome))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(book.genre, vec![fantasy.id]);
}

#[tokio::test]
async fn test_rejected_book_keeps_checked_genres() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "LeGuin").await;
    let fantasy = catalog.genre("Fantasy").await;
    let scifi = catalog.genre("Sci-Fi").await;
    let poetry = catalog.genre("Poetry").await;
    let author_id = author.id.to_string();
    let (fantasy_id, scifi_id) = (fantasy.id.to_string(), scifi.id.to_string());

    let outcome = catalog
        .services
        .books
        .create(&form(&[
            ("title", ""),
            ("author", author_id.as_str()),
            ("summary", "A wizard"),
            ("isbn", "9780547773742"),
            ("genre", fantasy_id.as_str()),
            ("genre", scifi_id.as_str()),
        ]))
        .await
        .unwrap();

    let Some(View::BookForm(page)) = outcome.view() else {
        panic!("expected book form, got {:?}", outcome);
    };
    assert_eq!(page.errors[0].message, "Title must not be empty.");
    assert_eq!(page.authors.len(), 1);

    let checked: Vec<Uuid> = page.genres.iter().filter(|g| g.checked).map(|g| g.id).collect();
    assert_eq!(checked, vec![fantasy.id, scifi.id]);
    assert!(page.genres.iter().any(|g| g.id == poetry.id && !g.checked));
    assert_eq!(catalog.store.books_count(BookFilter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_book_with_unknown_author_is_rejected() {
    let catalog = catalog();
    let ghost = Uuid::new_v4().to_string();

    let outcome = catalog
        .services
        .books
        .create(&form(&[
            ("title", "Nobody's Book"),
            ("author", ghost.as_str()),
            ("summary", "Nothing"),
            ("isbn", "0"),
        ]))
        .await
        .unwrap();

    let Some(View::BookForm(page)) = outcome.view() else {
        panic!("expected book form");
    };
    assert_eq!(page.errors[0].field, "author");
    assert_eq!(catalog.store.books_count(BookFilter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_form_prechecks_book_genres() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "LeGuin").await;
    let fantasy = catalog.genre("Fantasy").await;
    let poetry = catalog.genre("Poetry").await;
    let book = catalog.book("Earthsea", author.id, vec![poetry.id]).await;

    let outcome = catalog.services.books.update_form(book.id).await.unwrap();
    let Some(View::BookForm(page)) = outcome.view() else {
        panic!("expected book form");
    };
    assert_eq!(page.title, "Update Book");
    assert!(page.genres.iter().any(|g| g.id == poetry.id && g.checked));
    assert!(page.genres.iter().any(|g| g.id == fantasy.id && !g.checked));
}

#[tokio::test]
async fn test_copy_status_defaults_to_maintenance() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    let book_id = book.id.to_string();

    let outcome = catalog
        .services
        .book_instances
        .create(&form(&[("book", book_id.as_str()), ("imprint", "Penguin 2003")]))
        .await
        .unwrap();

    let copy = catalog
        .store
        .book_instances_find_by_id(redirected_id(&outcome))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.status, BookInstanceStatus::Maintenance);
    assert_eq!(copy.due_back, None);
}

#[tokio::test]
async fn test_copy_update_changes_status_and_due_back() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    let copy = catalog
        .store
        .book_instances_save(BookInstanceFields {
            book: book.id,
            imprint: "Penguin".into(),
            status: BookInstanceStatus::Available,
            due_back: None,
        })
        .await
        .unwrap();
    let book_id = book.id.to_string();

    let outcome = catalog
        .services
        .book_instances
        .update(
            copy.id,
            &form(&[
                ("book", book_id.as_str()),
                ("imprint", "Penguin"),
                ("status", "Loaned"),
                ("due_back", "2026-11-01"),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some(copy.url().as_str()));

    let stored = catalog
        .store
        .book_instances_find_by_id(copy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, BookInstanceStatus::Loaned);
    assert_eq!(stored.due_back.unwrap().to_string(), "2026-11-01");
    assert_eq!(
        catalog.store.book_instances_count(BookInstanceFilter::All).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_unknown_copy_status_is_rejected() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    let book_id = book.id.to_string();

    let outcome = catalog
        .services
        .book_instances
        .create(&form(&[("book", book_id.as_str()), ("imprint", "Penguin"), ("status", "Lost")]))
        .await
        .unwrap();

    let Some(View::BookInstanceForm(page)) = outcome.view() else {
        panic!("expected copy form");
    };
    assert_eq!(page.errors[0].message, "Invalid status");
    assert_eq!(page.selected_book.as_deref(), Some(book_id.as_str()));
    assert_eq!(
        catalog.store.book_instances_count(BookInstanceFilter::All).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_missing_entities_not_found_or_redirect() {
    let catalog = catalog();
    let services = &catalog.services;
    let id = Uuid::new_v4();

    assert!(matches!(services.authors.detail(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.authors.update_form(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.genres.detail(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.genres.update_form(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.books.detail(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.books.update_form(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.book_instances.detail(id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services.book_instances.update_form(id).await,
        Err(AppError::NotFound(_))
    ));

    let outcome = services.authors.delete_form(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/authors"));
    let outcome = services.genres.delete_form(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/genres"));
    let outcome = services.genres.delete(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/genres"));
    let outcome = services.books.delete_form(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/books"));
    let outcome = services.book_instances.delete_form(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/bookinstances"));
    let outcome = services.book_instances.delete(id).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/bookinstances"));
}

#[tokio::test]
async fn test_index_counts() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    let book = catalog.book("Emma", author.id, vec![]).await;
    catalog.genre("Romance").await;
    for status in [BookInstanceStatus::Available, BookInstanceStatus::Loaned] {
        catalog
            .store
            .book_instances_save(BookInstanceFields {
                book: book.id,
                imprint: "Penguin".into(),
                status,
                due_back: None,
            })
            .await
            .unwrap();
    }

    let outcome = catalog.services.home.index().await;
    let Some(View::Index(page)) = outcome.view() else {
        panic!("expected index");
    };
    assert_eq!(page.data.book_count, Tally::Count(1));
    assert_eq!(page.data.book_instance_count, Tally::Count(2));
    assert_eq!(page.data.book_instance_available_count, Tally::Count(1));
    assert_eq!(page.data.author_count, Tally::Count(1));
    assert_eq!(page.data.genre_count, Tally::Count(1));
    assert!(page.error.is_none());
}

#[tokio::test]
async fn test_author_list_ordered_by_family_name() {
    let catalog = catalog();
    catalog.author("Mary", "Shelley").await;
    catalog.author("Jane", "Austen").await;
    catalog.author("Charles", "Dickens").await;

    let outcome = catalog.services.authors.list().await.unwrap();
    let Some(View::AuthorList(page)) = outcome.view() else {
        panic!("expected author list");
    };
    let names: Vec<&str> = page.author_list.iter().map(|a| a.family_name.as_str()).collect();
    assert_eq!(names, vec!["Austen", "Dickens", "Shelley"]);
}
