//! OAuth endpoints.

use crate::core::HttpMethod;
use crate::template::{ApiTemplate, Param, Parameters, TemplateOptions};

/// `GET /oauth/authorize`: redirect the user to approve the application.
pub static AUTHORIZE: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        parameters: Parameters {
            path: &[],
            query: &[
                Param::required("response_type"),
                Param::required("client_id"),
                Param::required("redirect_uri"),
                Param::required("state"),
                Param::optional("signup"),
                Param::optional("prompt"),
            ],
        },
        ..TemplateOptions::NONE
    },
    ..ApiTemplate::new(
        HttpMethod::Get,
        "/oauth/authorize?response_type=&client_id=&redirect_uri=&state=&signup=&prompt=",
    )
};

/// `POST /oauth/token` with an authorization code.
pub static TOKEN_CODE: ApiTemplate = ApiTemplate {
    body: &[
        Param::required("client_id"),
        Param::required("client_secret"),
        Param::required("redirect_uri"),
        Param::required("grant_type"),
        Param::required("code"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/oauth/token")
};

/// `POST /oauth/token` with a refresh token.
pub static TOKEN_REFRESH: ApiTemplate = ApiTemplate {
    body: &[
        Param::required("client_id"),
        Param::required("client_secret"),
        Param::required("redirect_uri"),
        Param::required("grant_type"),
        Param::required("refresh_token"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/oauth/token")
};

/// `POST /oauth/revoke`
pub static REVOKE: ApiTemplate = ApiTemplate {
    body: &[
        Param::required("token"),
        Param::required("client_id"),
        Param::required("client_secret"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/oauth/revoke")
};

/// `POST /oauth/device/code`
pub static DEVICE_CODE: ApiTemplate = ApiTemplate {
    body: &[Param::required("client_id")],
    ..ApiTemplate::new(HttpMethod::Post, "/oauth/device/code")
};

/// `POST /oauth/device/token`
pub static DEVICE_TOKEN: ApiTemplate = ApiTemplate {
    body: &[
        Param::required("client_id"),
        Param::required("client_secret"),
        Param::required("code"),
    ],
    ..ApiTemplate::new(HttpMethod::Post, "/oauth/device/token")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("authentication.oauth.authorize", &AUTHORIZE),
    ("authentication.oauth.token.code", &TOKEN_CODE),
    ("authentication.oauth.token.refresh", &TOKEN_REFRESH),
    ("authentication.oauth.revoke", &REVOKE),
    ("authentication.device.code", &DEVICE_CODE),
    ("authentication.device.token", &DEVICE_TOKEN),
];
