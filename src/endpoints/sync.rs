//! Sync endpoints. All of them act on the authenticated user.

use crate::core::HttpMethod;
use crate::template::validators::{transform_start_date, validate_start_date};
use crate::template::{
    ApiTemplate, AuthRequirement, Param, Parameters, TemplateOptions, TraktApiExtended,
};

const AUTH: TemplateOptions = TemplateOptions {
    auth: AuthRequirement::Required,
    ..TemplateOptions::NONE
};

/// `GET /sync/last_activities`
pub static LAST_ACTIVITIES: ApiTemplate = ApiTemplate {
    opts: AUTH,
    ..ApiTemplate::new(HttpMethod::Get, "/sync/last_activities")
};

/// `GET /sync/history/:type/:id?start_at=&end_at=`
pub static HISTORY: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        pagination: true,
        extended: &[TraktApiExtended::Full],
        parameters: Parameters {
            path: &[Param::optional("type"), Param::optional("id")],
            query: &[Param::optional("start_at"), Param::optional("end_at")],
        },
        ..AUTH
    },
    ..ApiTemplate::new(HttpMethod::Get, "/sync/history/:type/:id?start_at=&end_at=")
};

/// `POST /sync/history`
pub static ADD_HISTORY: ApiTemplate = ApiTemplate {
    opts: AUTH,
    body: &[
        Param::optional("movies"),
        Param::optional("shows"),
        Param::optional("seasons"),
        Param::optional("episodes"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/sync/history")
};

/// `GET /sync/watchlist/:type/:sort?start_date=`; `start_date` is truncated to the hour.
pub static WATCHLIST: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        pagination: true,
        extended: &[TraktApiExtended::Full],
        parameters: Parameters {
            path: &[Param::optional("type"), Param::optional("sort")],
            query: &[Param::optional("start_date")],
        },
        ..AUTH
    },
    validate: Some(validate_start_date),
    transform: Some(transform_start_date),
    ..ApiTemplate::new(HttpMethod::Get, "/sync/watchlist/:type/:sort?start_date=")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("sync.last_activities", &LAST_ACTIVITIES),
    ("sync.history.get", &HISTORY),
    ("sync.history.add", &ADD_HISTORY),
    ("sync.watchlist.get", &WATCHLIST),
];
