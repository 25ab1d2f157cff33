mod common;

use axum::http::StatusCode;
use common::{body_text, form_request, get_request, spawn_app};
use filmlist::domain::MembershipId;
use filmlist::services::{FilmService, SeaOrmFilmService};

fn orders(films: &[filmlist::models::film::ListedFilm]) -> Vec<(String, i32)> {
    films.iter().map(|f| (f.name.clone(), f.order)).collect()
}

fn sort_body(ids: &[MembershipId]) -> String {
    ids.iter()
        .map(|id| format!("film_order={id}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[tokio::test]
async fn test_add_assigns_increasing_orders() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;

    for name in ["Alien", "Brazil", "Casablanca"] {
        let response = app.add_film(&cookie, name).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let user = app.user_id("alice").await;
    let films = app.store.list_user_films(user).await.unwrap();
    assert_eq!(
        orders(&films),
        vec![
            ("Alien".to_string(), 1),
            ("Brazil".to_string(), 2),
            ("Casablanca".to_string(), 3),
        ]
    );
    assert_eq!(app.store.max_film_order(user).await.unwrap(), 3);

    let service = SeaOrmFilmService::new(app.store.clone());
    assert_eq!(service.max_order(user).await.unwrap(), 3);
}

#[tokio::test]
async fn test_add_returns_notification_and_list() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;

    let response = app.add_film(&cookie, "  Solaris ").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Added Solaris to list of films"));
    assert!(body.contains("hx-get=\"/clear/\""));
    assert!(body.contains("name=\"film_order\""));
}

#[tokio::test]
async fn test_add_same_film_twice_is_idempotent() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;

    app.add_film(&cookie, "Heat").await;
    let response = app.add_film(&cookie, "Heat").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Added Heat to list of films"));

    let user = app.user_id("alice").await;
    let films = app.store.list_user_films(user).await.unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].order, 1);
    assert_eq!(app.store.film_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_users_share_catalog_rows() {
    let app = spawn_app().await;
    let alice = app.user_with_session("alice").await;
    let bob = app.user_with_session("bob").await;

    app.add_film(&alice, "Ran").await;
    app.add_film(&bob, "Ran").await;

    assert_eq!(app.store.film_count().await.unwrap(), 1);

    let alice_films = app
        .store
        .list_user_films(app.user_id("alice").await)
        .await
        .unwrap();
    let bob_films = app
        .store
        .list_user_films(app.user_id("bob").await)
        .await
        .unwrap();
    assert_eq!(alice_films[0].film_id, bob_films[0].film_id);
    assert_ne!(alice_films[0].id, bob_films[0].id);
}

#[tokio::test]
async fn test_add_blank_name_is_rejected() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;

    let response = app.add_film(&cookie, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("class=\"error\""));
    assert_eq!(app.store.film_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_renumbers_remaining() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;
    for name in ["Alien", "Brazil", "Casablanca"] {
        app.add_film(&cookie, name).await;
    }

    let user = app.user_id("alice").await;
    let films = app.store.list_user_films(user).await.unwrap();
    let middle = films[1].id;

    let response = app
        .send(form_request(
            "DELETE",
            &format!("/delete-film/{middle}/"),
            "",
            Some(&cookie),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("Brazil"));

    let films = app.store.list_user_films(user).await.unwrap();
    assert_eq!(
        orders(&films),
        vec![("Alien".to_string(), 1), ("Casablanca".to_string(), 2)]
    );
    // the catalog keeps the film
    assert_eq!(app.store.film_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;

    let response = app
        .send(form_request("DELETE", "/delete-film/999/", "", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(form_request("DELETE", "/delete-film/abc/", "", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sort_applies_submitted_order() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;
    for name in ["A", "B", "C"] {
        app.add_film(&cookie, name).await;
    }

    let user = app.user_id("alice").await;
    let films = app.store.list_user_films(user).await.unwrap();
    let (a, b, c) = (films[0].id, films[1].id, films[2].id);

    let response = app
        .send(form_request("POST", "/sort/", &sort_body(&[c, a, b]), Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let films = app.store.list_user_films(user).await.unwrap();
    assert_eq!(
        orders(&films),
        vec![
            ("C".to_string(), 1),
            ("A".to_string(), 2),
            ("B".to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_foreign_memberships_are_rejected() {
    let app = spawn_app().await;
    let alice = app.user_with_session("alice").await;
    let mallory = app.user_with_session("mallory").await;

    app.add_film(&alice, "Vertigo").await;
    app.add_film(&alice, "Psycho").await;
    app.add_film(&mallory, "Rope").await;

    let alice_id = app.user_id("alice").await;
    let alice_films = app.store.list_user_films(alice_id).await.unwrap();
    let mallory_films = app
        .store
        .list_user_films(app.user_id("mallory").await)
        .await
        .unwrap();

    let target = alice_films[0].id;
    let response = app
        .send(form_request(
            "DELETE",
            &format!("/delete-film/{target}/"),
            "",
            Some(&mallory),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = sort_body(&[alice_films[1].id, mallory_films[0].id]);
    let response = app
        .send(form_request("POST", "/sort/", &body, Some(&mallory)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let after = app.store.list_user_films(alice_id).await.unwrap();
    assert_eq!(after, alice_films);
}

#[tokio::test]
async fn test_search_excludes_listed_films() {
    let app = spawn_app().await;
    let alice = app.user_with_session("alice").await;
    let bob = app.user_with_session("bob").await;

    app.add_film(&bob, "The Matrix").await;
    app.add_film(&bob, "Matilda").await;
    app.add_film(&alice, "Matilda").await;

    let response = app
        .send(form_request("POST", "/search-film/", "search=mat", Some(&alice)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("The Matrix"));
    assert!(!body.contains("Matilda"));
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;
    let other = app.user_with_session("bob").await;

    app.add_film(&other, "100% Wolf").await;
    app.add_film(&other, "Up").await;

    let response = app
        .send(form_request("POST", "/search-film/", "search=%25", Some(&cookie)))
        .await;
    let body = body_text(response).await;
    assert!(body.contains("100% Wolf"));
    assert!(!body.contains(">Up<"));
}

#[tokio::test]
async fn test_list_page_renders_in_order() {
    let app = spawn_app().await;
    let cookie = app.user_with_session("alice").await;
    app.add_film(&cookie, "Zodiac").await;
    app.add_film(&cookie, "Amelie").await;

    let response = app.send(get_request("/films/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let zodiac = body.find("Zodiac").expect("Zodiac listed");
    let amelie = body.find("Amelie").expect("Amelie listed");
    assert!(zodiac < amelie);
}
