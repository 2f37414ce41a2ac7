use crate::api::handlers::{admin, auth, comments, health, image, manga, progress, reader, reviews};
use crate::api::session::{require_admin, require_session};
use crate::api::types::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Base64 page uploads are far larger than the default JSON limit.
const IMAGE_UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/mangas",
            get(admin::list_mangas).post(admin::create_manga),
        )
        .route(
            "/mangas/:id",
            put(admin::update_manga).delete(admin::delete_manga),
        )
        .route(
            "/mangas/:id/volumes",
            get(admin::list_volumes).post(admin::create_volume),
        )
        .route(
            "/mangas/:id/characters",
            get(admin::list_characters).post(admin::create_character),
        )
        .route(
            "/volumes/:id",
            put(admin::update_volume).delete(admin::delete_volume),
        )
        .route(
            "/volumes/:id/chapters",
            get(admin::list_chapters).post(admin::create_chapter),
        )
        .route(
            "/chapters/:id",
            put(admin::update_chapter).delete(admin::delete_chapter),
        )
        .route(
            "/characters/:id",
            put(admin::update_character).delete(admin::delete_character),
        )
        .route(
            "/images",
            post(image::upload_image).layer(DefaultBodyLimit::max(IMAGE_UPLOAD_LIMIT)),
        )
        .route_layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/session", get(auth::current_session))
        .route("/mangas", get(manga::list_mangas))
        .route("/mangas/:id", get(manga::get_manga))
        .route(
            "/mangas/:id/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/mangas/:id/progress", get(progress::get_progress))
        .route("/mangas/:id/progress/rating", put(progress::set_rating))
        .route("/mangas/:id/progress/favorite", put(progress::set_favorite))
        .route("/reader/:manga_id/:chapter_id", get(reader::read_chapter))
        .route(
            "/chapters/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .nest("/admin", admin)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/images/:hash", get(image::get_image));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
