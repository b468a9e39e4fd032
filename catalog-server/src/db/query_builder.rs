//! Dynamic SQL for the product listing
//!
//! Conditions are collected independently and bound through numbered
//! PostgreSQL placeholders, so clause order never shifts parameter positions.

use shared::models::ListingQuery;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;

/// Query builder for constructing SQL queries with dynamic WHERE conditions
#[derive(Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    TextArray(Vec<String>),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; reference bound values through the placeholders
    /// returned by the `bind_*` methods
    pub fn add_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    fn push(&mut self, value: QueryValue) -> String {
        self.bindings.push(value);
        format!("${}", self.bindings.len())
    }

    /// Bind a text value, returning its placeholder
    pub fn bind_text(&mut self, value: impl Into<String>) -> String {
        self.push(QueryValue::Text(value.into()))
    }

    /// Bind an integer value, returning its placeholder
    pub fn bind_i64(&mut self, value: i64) -> String {
        self.push(QueryValue::Integer(value))
    }

    /// Bind a `TEXT[]` value, returning its placeholder
    pub fn bind_text_array(&mut self, values: Vec<String>) -> String {
        self.push(QueryValue::TextArray(values))
    }

    /// Case-insensitive substring match across several columns.
    ///
    /// The term is matched literally: `%`, `_` and `\` are escaped. NULL
    /// columns simply fail their side of the OR.
    pub fn add_search_condition(&mut self, fields: &[&str], search: &str) -> &mut Self {
        let placeholder = self.bind_text(format!("%{}%", escape_like(search)));
        let field_conditions: Vec<String> = fields
            .iter()
            .map(|field| format!("{field} ILIKE {placeholder}"))
            .collect();
        self.add_condition(format!("({})", field_conditions.join(" OR ")))
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn bindings(&self) -> &[QueryValue] {
        &self.bindings
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings<'q, O>(
        &'q self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.as_str()),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::TextArray(values) => query.bind(values.as_slice()),
            };
        }
        query
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `category_tree` CTE: active categories named by the slug array bound at
/// `slugs_placeholder`, plus every active descendant.
///
/// `UNION` deduplicates, so a cyclic parent chain converges instead of looping.
pub fn subtree_cte(slugs_placeholder: &str) -> String {
    format!(
        "category_tree AS (\
            SELECT c.id FROM categories c \
            WHERE c.slug = ANY({slugs_placeholder}) AND c.is_active \
            UNION \
            SELECT c.id FROM categories c \
            JOIN category_tree t ON c.parent_id = t.id \
            WHERE c.is_active\
        )"
    )
}

/// Columns selected for each listing row
const LISTING_COLUMNS: &str = "COUNT(*) OVER() AS total_count, \
    p.id, p.name, p.slug, p.price, p.sale_price, p.stock, p.category_id, p.brand_id, \
    c.id AS category_ref_id, c.name AS category_name, c.slug AS category_slug, \
    b.id AS brand_ref_id, b.name AS brand_name, b.slug AS brand_slug";

/// Category and brand are joined only while active; a dangling reference leaves
/// the ref columns NULL without dropping the product
const LISTING_FROM: &str = "FROM products p \
    LEFT JOIN categories c ON c.id = p.category_id AND c.is_active \
    LEFT JOIN brands b ON b.id = p.brand_id AND b.is_active";

/// Complete listing statement with its bindings
#[derive(Debug)]
pub struct ListingSql {
    pub sql: String,
    pub builder: QueryBuilder,
}

/// Translate a validated listing request into one statement.
///
/// The window count is evaluated before LIMIT/OFFSET, so every row carries the
/// total for the whole filter.
pub fn build_listing(query: &ListingQuery) -> ListingSql {
    let mut builder = QueryBuilder::new();
    builder.add_condition("p.is_active");

    let mut with_clause = String::new();
    if query.has_category_filter() {
        let slugs = builder.bind_text_array(query.categories.clone());
        with_clause = format!("WITH RECURSIVE {} ", subtree_cte(&slugs));
        builder.add_condition("p.category_id IN (SELECT id FROM category_tree)");
    }

    if let Some(term) = query.search_term() {
        builder.add_search_condition(&["p.name", "p.description"], term);
    }

    let column = match query.sort_field {
        shared::models::SortField::Name => "p.name",
        shared::models::SortField::Price => "p.price",
        shared::models::SortField::Stock => "p.stock",
    };
    let direction = query.sort_direction.as_sql();
    let limit = builder.bind_i64(query.limit);
    let offset = builder.bind_i64(query.offset);

    let sql = format!(
        "{with_clause}SELECT {LISTING_COLUMNS} {LISTING_FROM}{} \
         ORDER BY {column} {direction}, p.id {direction} \
         LIMIT {limit} OFFSET {offset}",
        builder.build_where_clause()
    );

    ListingSql { sql, builder }
}
