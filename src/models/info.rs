use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InfoApi {
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}
