use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SearchTimeItem {
    pub availability_id: u64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Default, Serialize)]
pub struct SearchTimeResponse {
    pub success: bool,
    pub err: String,
    pub times: Vec<SearchTimeItem>,
}

crate::impl_err_response! {
    SearchTimeResponse,
}
