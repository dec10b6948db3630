//! Template engine: turns a template and call parameters into a URL and body.

use serde_json::{Map, Value};
use std::borrow::Cow;
use url::Url;

use super::{value_to_string, ApiTemplate, RequestParams};
use crate::error::{TraktError, TraktResult};
use crate::filters::{TraktApiFilter, TraktApiFilterValidator};

/// Resolved URL and serialized JSON body for one call.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltRequest {
    pub url: Url,
    pub body: Option<String>,
}

/// Builds the request URL and body, failing fast on the first violation.
///
/// Checks run in the order path, query, filters, pagination, extended, body,
/// after the template's validate and transform hooks.
pub fn build_request(
    template: &ApiTemplate,
    params: &RequestParams,
    endpoint: &str,
) -> TraktResult<BuiltRequest> {
    if let Some(validate) = template.validate {
        validate(params)?;
    }

    let params: Cow<'_, RequestParams> = match template.transform {
        Some(transform) => Cow::Owned(transform(params.clone())),
        None => Cow::Borrowed(params),
    };

    let mut url = Url::parse(endpoint)
        .map_err(|e| TraktError::configuration(format!("Invalid endpoint '{endpoint}': {e}")))?;

    let segments = path_segments(template, &params)?;
    url.path_segments_mut()
        .map_err(|_| TraktError::configuration(format!("Endpoint cannot be a base: '{endpoint}'")))?
        .pop_if_empty()
        .extend(&segments);

    let mut query: Vec<(String, String)> = Vec::new();

    for param in template.opts.parameters.query {
        match params.string_value(param.name) {
            Some(value) => query.push((param.name.to_string(), value)),
            None if param.required => {
                return Err(TraktError::invalid_parameter(format!(
                    "Missing mandatory query parameter: '{}'",
                    param.name
                )));
            }
            None => {}
        }
    }

    for (key, value) in &params.filters {
        let filter = TraktApiFilter::parse(key)
            .filter(|f| template.opts.filters.contains(f))
            .ok_or_else(|| TraktError::filter(format!("Filter is not supported: '{key}'")))?;

        let rendered = value_to_string(value).unwrap_or_default();
        if !TraktApiFilterValidator::validate(filter, value, true)? {
            return Err(TraktError::validation(format!(
                "Filter '{key}' is invalid: '{rendered}'"
            )));
        }
        query.push((key.clone(), rendered));
    }

    if template.opts.pagination {
        if let Some(pagination) = &params.pagination {
            if let Some(page) = pagination.page {
                query.push(("page".to_string(), page.to_string()));
            }
            if let Some(limit) = pagination.limit {
                query.push(("limit".to_string(), limit.to_string()));
            }
        }
    }

    let allowed = template.opts.extended;
    if let Some(requested) = params.extended.as_ref().filter(|e| !e.is_empty()) {
        if !allowed.is_empty() {
            if requested
                .iter()
                .any(|mode| !allowed.iter().any(|a| a.as_str() == mode))
            {
                let allowed: Vec<&str> = allowed.iter().map(|a| a.as_str()).collect();
                return Err(TraktError::invalid_parameter(format!(
                    "Invalid value '{}', extended should be '{}'",
                    requested.join(","),
                    allowed.join(", ")
                )));
            }
            query.push(("extended".to_string(), requested.join(",")));
        }
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(&query);
    }

    let body = build_body(template, &params)?;

    Ok(BuiltRequest { url, body })
}

fn path_segments(template: &ApiTemplate, params: &RequestParams) -> TraktResult<Vec<String>> {
    let mut segments = Vec::new();

    for segment in template.path().split('/').filter(|s| !s.is_empty()) {
        let Some(name) = segment.strip_prefix(':') else {
            segments.push(segment.to_string());
            continue;
        };

        // Undeclared placeholders must be supplied.
        let required = template
            .opts
            .parameters
            .path
            .iter()
            .find(|p| p.name == name)
            .map_or(true, |p| p.required);

        match params.string_value(name) {
            Some(value) => segments.push(value),
            None if required => {
                return Err(TraktError::invalid_parameter(format!(
                    "Missing mandatory path parameter: '{name}'"
                )));
            }
            None => {}
        }
    }

    Ok(segments)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn build_body(template: &ApiTemplate, params: &RequestParams) -> TraktResult<Option<String>> {
    if template.body.is_empty() {
        return Ok(None);
    }

    let mut body = Map::new();
    for field in template.body {
        match params.get(field.name) {
            Some(value) if is_present(value) => {
                body.insert(field.name.to_string(), value.clone());
            }
            _ if field.required => {
                return Err(TraktError::invalid_parameter(format!(
                    "Missing mandatory body parameter: '{}'",
                    field.name
                )));
            }
            _ => {}
        }
    }

    serde_json::to_string(&body)
        .map(Some)
        .map_err(|e| TraktError::deserialization(e.to_string()))
}
