use warp::{
    filters::{path, BoxedFilter},
    Filter, Rejection, Reply,
};

use crate::{error::WebErrorExt, StatePackage};

pub fn routes(state: StatePackage<'_>) -> BoxedFilter<(impl Reply,)> {
    let snapshot = {
        let system = state.system.clone();
        path::end().and(warp::get()).and_then(move || {
            let system = system.clone();
            async move {
                let data = system.snapshot().await.reject_err()?;
                Ok::<_, Rejection>(warp::reply::json(&data))
            }
        })
    };

    let temperature = {
        let readings = state.readings.clone();
        warp::path!("temp")
            .and(warp::get())
            .map(move || readings.temperature().to_string())
    };

    snapshot.or(temperature).boxed()
}
