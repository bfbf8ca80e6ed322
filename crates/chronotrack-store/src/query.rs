//! Filter/order/limit builder for REST queries
//!
//! Emits the backend's `column=op.value` query-string pairs.

#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column projection (`select=...`); defaults to `*` when omitted
    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs
            .push((column.to_string(), format!("lte.{}", value.to_string())));
        self
    }

    pub fn in_list(mut self, column: &str, values: &[&str]) -> Self {
        self.pairs
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.pairs
            .push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.pairs.push(("limit".to_string(), count.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}
