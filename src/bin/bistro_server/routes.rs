use super::*;

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    let authed = Router::new()
        .route("/media/signed-urls", post(create_signed_urls))
        .route("/media/files", delete(delete_files))
        .route("/restaurants", post(create_restaurant).get(list_restaurants))
        .route(
            "/restaurants/:id",
            get(get_restaurant)
                .patch(patch_restaurant)
                .delete(delete_restaurant),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/storage/*key", put(put_object).get(get_object))
        .merge(authed)
        .with_state(state)
}
