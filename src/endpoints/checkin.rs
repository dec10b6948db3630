//! Check-in and scrobble endpoints.

use crate::core::HttpMethod;
use crate::template::{ApiTemplate, AuthRequirement, Param, TemplateOptions};

const AUTH: TemplateOptions = TemplateOptions {
    auth: AuthRequirement::Required,
    ..TemplateOptions::NONE
};

/// `POST /checkin` for a movie or an episode.
pub static CHECKIN: ApiTemplate = ApiTemplate {
    opts: AUTH,
    body: &[
        Param::optional("movie"),
        Param::optional("episode"),
        Param::optional("show"),
        Param::optional("sharing"),
        Param::optional("message"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/checkin")
};

/// `DELETE /checkin`
pub static DELETE_CHECKIN: ApiTemplate = ApiTemplate {
    opts: AUTH,
    ..ApiTemplate::new(HttpMethod::Delete, "/checkin")
};

/// `POST /scrobble/start`
pub static SCROBBLE_START: ApiTemplate = ApiTemplate {
    opts: AUTH,
    body: &[
        Param::optional("movie"),
        Param::optional("episode"),
        Param::optional("show"),
        Param::required("progress"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/scrobble/start")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("checkin.add", &CHECKIN),
    ("checkin.delete", &DELETE_CHECKIN),
    ("scrobble.start", &SCROBBLE_START),
];
