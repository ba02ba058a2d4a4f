use http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

pub trait WebErrorExt {
    type Out;
    fn reject_err(self) -> Self::Out;
}

impl<T, E: Into<anyhow::Error>> WebErrorExt for Result<T, E> {
    type Out = Result<T, Rejection>;
    fn reject_err(self) -> Self::Out {
        self.map_err(|e| warp::reject::custom(ServerError(e.into())))
    }
}

#[derive(Debug)]
struct ServerError(anyhow::Error);

impl Reject for ServerError {}

/// Turns a [`ServerError`] into a bare 500; everything else keeps warp's default handling.
pub async fn recover_server_error(rejection: Rejection) -> Result<impl Reply, Rejection> {
    let Some(ServerError(err)) = rejection.find::<ServerError>() else {
        return Err(rejection);
    };

    tracing::error!("request failed: {err:#}");
    Ok(warp::reply::with_status(
        "internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}
