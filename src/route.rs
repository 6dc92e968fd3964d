//! Start-up routing: a raw `id` value either opens the detail screen or
//! redirects to the list.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const ID_PARAM: &str = "id";
pub const LIST_LOCATION: &str = "list";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    List,
    Detail(u16),
}

/// Location shown for a committed detail id.
pub fn detail_location(id: u16) -> String {
    format!("detail?{ID_PARAM}={id}")
}

/// Accepts a bare value (`25`) or a query string (`?id=25`, `detail?id=25&x=1`).
pub fn parse_detail_id(raw: Option<&str>, max_id: u16) -> Result<u16, ValidationError> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty());
    let Some(raw) = raw else {
        return Err(ValidationError::Missing);
    };
    let value = if raw.contains('=') {
        query_value(raw, ID_PARAM).ok_or(ValidationError::Missing)?
    } else {
        raw
    };
    let value = value.trim();
    let id: i64 = value
        .parse()
        .map_err(|_| ValidationError::NotNumeric(value.to_string()))?;
    if id < 1 || id > i64::from(max_id) {
        return Err(ValidationError::OutOfRange { id, max: max_id });
    }
    Ok(id as u16)
}

pub fn resolve(raw: Option<&str>, max_id: u16) -> Route {
    match parse_detail_id(raw, max_id) {
        Ok(id) => Route::Detail(id),
        Err(err) => {
            if raw.is_some() {
                tracing::warn!(error = %err, "invalid detail id; redirecting to list");
            }
            Route::List
        }
    }
}

fn query_value<'a>(raw: &'a str, key: &str) -> Option<&'a str> {
    let query = raw.rsplit_once('?').map(|(_, query)| query).unwrap_or(raw);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == key)
        .map(|(_, value)| value)
}
