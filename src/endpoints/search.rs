//! Search endpoints.

use crate::core::HttpMethod;
use crate::filters::SHOW_FILTERS;
use crate::template::{
    ApiTemplate, AuthRequirement, Param, Parameters, TemplateOptions, TraktApiExtended,
};

/// `GET /search/:type?query=&fields=`; `type` may be a comma separated list.
pub static TEXT: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        auth: AuthRequirement::Optional,
        pagination: true,
        extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
        filters: SHOW_FILTERS,
        parameters: Parameters {
            path: &[Param::required("type")],
            query: &[Param::required("query"), Param::optional("fields")],
        },
    },
    ..ApiTemplate::new(HttpMethod::Get, "/search/:type?query=&fields=")
};

/// `GET /search/:id_type/:id?type=`
pub static ID: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        auth: AuthRequirement::Optional,
        pagination: true,
        extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
        filters: &[],
        parameters: Parameters {
            path: &[Param::required("id_type"), Param::required("id")],
            query: &[Param::optional("type")],
        },
    },
    ..ApiTemplate::new(HttpMethod::Get, "/search/:id_type/:id?type=")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[("search.text", &TEXT), ("search.id", &ID)];
