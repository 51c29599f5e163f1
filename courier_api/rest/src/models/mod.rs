use serde::Serialize;

pub mod contact;

#[derive(Serialize)]
pub struct ApiError<D> {
    pub detail: D,
}

#[derive(Serialize)]
pub struct ApiSuccess {
    pub success: bool,
}
