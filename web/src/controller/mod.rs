use serde::Serialize;

pub(crate) mod analysis_controller;
pub(crate) mod export_controller;
pub(crate) mod health_check_controller;
pub(crate) mod research_project_controller;
pub(crate) mod session_controller;
pub(crate) mod upload_controller;

/// Response envelope shared by every JSON endpoint. `status` is either
/// "success" or "error".
#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse<T: Serialize> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success_with_message(message: &str, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.to_string()),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            status: "error",
            message: Some(message.to_string()),
            data: None,
        }
    }
}
