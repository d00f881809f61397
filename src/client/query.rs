use core::fmt;

use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMethod {
    Exact,
    Planned,
    Estimated,
}

impl fmt::Display for CountMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountMethod::Exact => write!(f, "exact"),
            CountMethod::Planned => write!(f, "planned"),
            CountMethod::Estimated => write!(f, "estimated"),
        }
    }
}

/// A read against a single table, rendered as PostgREST query parameters and headers.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    columns: String,
    limit: Option<u32>,
    count: Option<CountMethod>,
    head: bool,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            limit: None,
            count: None,
            head: false,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn count(mut self, method: CountMethod) -> Self {
        self.count = Some(method);
        self
    }

    /// Only fetch headers; used when the caller needs the count and not the rows.
    pub fn head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn is_head(&self) -> bool {
        self.head
    }

    pub fn wants_count(&self) -> bool {
        self.count.is_some()
    }

    pub fn method(&self) -> Method {
        match self.head {
            true => Method::HEAD,
            false => Method::GET,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }

    pub fn prefer(&self) -> Option<String> {
        self.count.map(|method| format!("count={}", method))
    }
}
