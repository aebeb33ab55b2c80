//! Store and account bootstrap tests.

use watchlist::cli::{DEMO_MOVIES, DEMO_NAME};
use watchlist::config::SecurityConfig;
use watchlist::db::{OwnerWrite, Store};
use watchlist::services::{AuthError, AuthService, SeaOrmAuthService};

fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("watchlist-store-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store")
}

#[tokio::test]
async fn test_movie_crud() {
    let store = temp_store().await;

    let movie = store.add_movie("Test Movie Title", "2019").await.unwrap();
    assert_eq!(store.count_movies().await.unwrap(), 1);
    assert_eq!(store.get_movie(movie.id).await.unwrap(), Some(movie.clone()));

    assert!(store.update_movie(movie.id, "Edited", "2020").await.unwrap());
    let edited = store.get_movie(movie.id).await.unwrap().unwrap();
    assert_eq!(edited.title, "Edited");
    assert_eq!(edited.year, "2020");

    assert!(!store.update_movie(999, "Ghost", "2020").await.unwrap());

    assert!(store.remove_movie(movie.id).await.unwrap());
    assert!(!store.remove_movie(movie.id).await.unwrap());
    assert_eq!(store.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn test_movies_listed_in_insertion_order() {
    let store = temp_store().await;

    store.add_movies(DEMO_MOVIES).await.unwrap();

    let movies = store.list_movies().await.unwrap();
    assert_eq!(movies.len(), DEMO_MOVIES.len());
    assert_eq!(movies[0].title, DEMO_MOVIES[0].0);
    assert_eq!(movies.last().unwrap().title, DEMO_MOVIES.last().unwrap().0);
}

#[tokio::test]
async fn test_admin_upsert_keeps_single_owner() {
    let store = temp_store().await;
    let security = fast_security();

    let first = store
        .upsert_owner_credentials("admin", "secret", "Admin", &security)
        .await
        .unwrap();
    assert_eq!(first, OwnerWrite::Created);

    let second = store
        .upsert_owner_credentials("renamed", "other", "Admin", &security)
        .await
        .unwrap();
    assert_eq!(second, OwnerWrite::Updated);

    assert_eq!(store.count_users().await.unwrap(), 1);
    let owner = store.get_owner().await.unwrap().unwrap();
    assert_eq!(owner.username.as_deref(), Some("renamed"));
    assert_eq!(owner.name, "Admin");
}

#[tokio::test]
async fn test_forge_then_admin_assigns_credentials() {
    let store = temp_store().await;
    let security = fast_security();

    assert_eq!(
        store.upsert_owner_name(DEMO_NAME).await.unwrap(),
        OwnerWrite::Created
    );
    let auth = SeaOrmAuthService::new(store.clone(), security.clone());

    // No credentials yet, so nobody can log in
    assert!(!auth.verify("", "").await.unwrap());

    store
        .upsert_owner_credentials("admin", "secret", "Admin", &security)
        .await
        .unwrap();

    assert_eq!(store.count_users().await.unwrap(), 1);
    let owner = store.get_owner().await.unwrap().unwrap();
    assert_eq!(owner.name, DEMO_NAME);
    assert!(auth.verify("admin", "secret").await.unwrap());
}

#[tokio::test]
async fn test_password_hash_never_plaintext() {
    let store = temp_store().await;

    store
        .upsert_owner_credentials("admin", "secret", "Admin", &fast_security())
        .await
        .unwrap();

    let (_, hash) = store.get_owner_with_password().await.unwrap().unwrap();
    let hash = hash.unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("secret"));
}

#[tokio::test]
async fn test_auth_service() {
    let store = temp_store().await;
    let security = fast_security();
    store
        .upsert_owner_credentials("test", "123", "Test", &security)
        .await
        .unwrap();
    let auth = SeaOrmAuthService::new(store.clone(), security);

    assert!(auth.verify("test", "123").await.unwrap());
    assert!(!auth.verify("test", "456").await.unwrap());
    assert!(!auth.verify("nobody", "123").await.unwrap());

    let user = auth.login("test", "123").await.unwrap();
    assert_eq!(user.name, "Test");
    assert!(matches!(
        auth.login("test", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));

    auth.set_password(user.id, "new-password").await.unwrap();
    assert!(!auth.verify("test", "123").await.unwrap());
    assert!(auth.verify("test", "new-password").await.unwrap());

    auth.update_name(user.id, "Renamed").await.unwrap();
    assert_eq!(auth.owner().await.unwrap().unwrap().name, "Renamed");

    assert!(matches!(
        auth.update_name(999, "Ghost").await,
        Err(AuthError::UserNotFound)
    ));
    assert!(auth.load_user(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_drops_everything() {
    let store = temp_store().await;
    store.add_movie("Test Movie Title", "2019").await.unwrap();
    store.upsert_owner_name("Test").await.unwrap();

    store.reset().await.unwrap();

    assert_eq!(store.count_movies().await.unwrap(), 0);
    assert_eq!(store.count_users().await.unwrap(), 0);
}
