//! Column value conversions shared by the repositories.

use std::fmt::Display;

use sea_orm::DbErr;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Parses a coded `TEXT` column.
pub(crate) fn decode<T>(column: &str, raw: &str, parse: fn(&str) -> Option<T>) -> Result<T, DbErr> {
    parse(raw).ok_or_else(|| DbErr::Type(format!("invalid {column} value '{raw}'")))
}

/// Narrows a stored integer into its domain type.
pub(crate) fn narrow<S, T>(column: &str, raw: S) -> Result<T, DbErr>
where
    S: Copy + Display,
    T: TryFrom<S>,
{
    T::try_from(raw).map_err(|_| DbErr::Type(format!("{column} value {raw} is out of range")))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, DbErr> {
    serde_json::to_string(value).map_err(|e| DbErr::Json(e.to_string()))
}

pub(crate) fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, DbErr> {
    serde_json::from_str(raw).map_err(|e| DbErr::Json(e.to_string()))
}
