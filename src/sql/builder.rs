//! Builds parameterized SELECT and UPDATE statements whose WHERE/SET shape depends on the request.

use crate::sql::PgBindValue;
use crate::store::{qualified_table, tables};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

/// Product columns in table order, prefixed with the `p` alias used by every product query.
pub const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.slug, p.stock, p.price, p.rating, \
     p.seller_id, p.category_id, p.created_at, p.updated_at";

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    /// Append a parameter and return its placeholder number.
    fn push_param(&mut self, v: impl Into<PgBindValue>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }

    /// `sqlx::query_as` over the built SQL with every parameter bound in order.
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let mut query = sqlx::query_as::<_, O>(&self.sql);
        for p in &self.params {
            query = query.bind(p.clone());
        }
        query
    }
}

/// Filters for product listings. Every field is optional; set fields are AND-ed.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub seller_id: Option<i64>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub category_id: Option<i64>,
    /// Seller's province, exact match.
    pub province: Option<String>,
    /// Seller's city, exact match.
    pub city: Option<String>,
    /// Restrict to products of APPROVED sellers.
    pub approved_only: bool,
}

/// SELECT products joined to their seller, newest first.
pub fn select_products(filter: &ProductFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(seller_id) = filter.seller_id {
        let n = q.push_param(seller_id);
        where_parts.push(format!("p.seller_id = ${}", n));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let n = q.push_param(search);
        where_parts.push(format!("STRPOS(LOWER(p.name), LOWER(${})) > 0", n));
    }
    if let Some(category_id) = filter.category_id {
        let n = q.push_param(category_id);
        where_parts.push(format!("p.category_id = ${}", n));
    }
    if let Some(province) = filter.province.as_deref().filter(|s| !s.is_empty()) {
        let n = q.push_param(province);
        where_parts.push(format!("s.pic_province = ${}", n));
    }
    if let Some(city) = filter.city.as_deref().filter(|s| !s.is_empty()) {
        let n = q.push_param(city);
        where_parts.push(format!("s.pic_city = ${}", n));
    }
    if filter.approved_only {
        where_parts.push("s.status = 'APPROVED'".to_string());
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {} p JOIN {} s ON s.id = p.seller_id{} ORDER BY p.created_at DESC, p.id DESC",
        PRODUCT_COLUMNS,
        qualified_table(tables::PRODUCTS),
        qualified_table(tables::SELLERS),
        where_clause
    );
    q
}

/// UPDATE `table` SET the given columns plus `updated_at = NOW()` WHERE every key matches, RETURNING *.
/// Column names come from code, never from the request body.
pub fn update(
    table: &str,
    sets: Vec<(&'static str, PgBindValue)>,
    keys: Vec<(&'static str, PgBindValue)>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut set_parts = Vec::with_capacity(sets.len() + 1);
    for (col, v) in sets {
        let n = q.push_param(v);
        set_parts.push(format!("{} = ${}", col, n));
    }
    set_parts.push("updated_at = NOW()".to_string());
    let mut where_parts = Vec::with_capacity(keys.len());
    for (col, v) in keys {
        let n = q.push_param(v);
        where_parts.push(format!("{} = ${}", col, n));
    }
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} RETURNING *",
        qualified_table(table),
        set_parts.join(", "),
        where_parts.join(" AND ")
    );
    q
}
