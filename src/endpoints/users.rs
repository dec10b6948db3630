use crate::core::HttpMethod;
use crate::template::{ApiTemplate, AuthRequirement, TemplateOptions};

/// `GET /users/settings`
pub static SETTINGS: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        auth: AuthRequirement::Required,
        ..TemplateOptions::NONE
    },
    ..ApiTemplate::new(HttpMethod::Get, "/users/settings")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[("users.settings", &SETTINGS)];
