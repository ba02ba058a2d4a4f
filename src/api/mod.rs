use std::path::Path;

use http::Method;
use warp::{filters::BoxedFilter, Filter, Reply};

use crate::{error::recover_server_error, StatePackage};

pub mod data;

pub fn routes(state: StatePackage<'_>) -> BoxedFilter<(impl Reply,)> {
    let data = warp::path(models::routes::DATA)
        .and(data::routes(state))
        .recover(recover_server_error);
    let assets = assets(state.assets);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods([Method::GET, Method::POST]);

    data.or(assets)
        .with(cors)
        .with(warp::trace::request())
        .boxed()
}

/// Static files of the display client. Unknown paths get `index.html` so the page can load anywhere.
fn assets(dir: &Path) -> BoxedFilter<(impl Reply,)> {
    let index = dir.join("index.html");
    warp::get()
        .and(warp::fs::dir(dir.to_path_buf()).or(warp::fs::file(index)).unify())
        .boxed()
}
