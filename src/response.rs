//! Response envelopes: `{ "data": ... }` for one item, `{ "data": [...], "meta": { "count" } }` for lists.

use crate::stats::Period;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

#[derive(Serialize)]
pub struct ListMeta {
    pub count: u64,
    /// Set on analytics lists that accept `?period=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<&'static str>,
}

/// 201 with the created resource.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope { data, meta: None }))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { data, meta: None }))
}

pub fn list<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(Envelope {
            data,
            meta: Some(ListMeta { count, period: None }),
        }),
    )
}

pub fn list_for_period<T: Serialize>(data: Vec<T>, period: Period) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(Envelope {
            data,
            meta: Some(ListMeta {
                count,
                period: Some(period.as_str()),
            }),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_meta_counts_items() {
        let (status, Json(body)) = list(vec!["a", "b", "c"]);
        assert_eq!(status, StatusCode::OK);
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["meta"]["count"], 3);
        assert!(v["meta"].get("period").is_none());
    }

    #[test]
    fn single_item_has_no_meta() {
        let (status, Json(body)) = created(serde_json::json!({ "key": "1/a.jpeg" }));
        assert_eq!(status, StatusCode::CREATED);
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("meta").is_none());
        assert_eq!(v["data"]["key"], "1/a.jpeg");
    }

    #[test]
    fn period_is_reported() {
        let (_, Json(body)) = list_for_period(vec![1, 2], Period::Week);
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["meta"]["period"], "7d");
    }
}
