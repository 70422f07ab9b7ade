use std::fmt;
use std::str::FromStr;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::{is_false, is_zero, require, Client, ClientError};

#[derive(Debug, Deserialize)]
struct GetQueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub parameters: QueryParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<QueryFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_combination: Option<FilterCombination>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calculations: Vec<QueryCalculation>,
    #[serde(default, rename = "groupBys", skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<QueryGroupBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<QueryOrderBy>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needle: Option<SearchNeedle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub filter_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterCombination {
    And,
    Or,
}

impl FilterCombination {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCombination::And => "AND",
            FilterCombination::Or => "OR",
        }
    }
}

impl fmt::Display for FilterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCombination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(FilterCombination::And),
            "OR" => Ok(FilterCombination::Or),
            other => Err(format!(
                "invalid filter combination '{}', must be AND or OR",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCalculation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operator: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroupBy {
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub group_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOrderBy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNeedle {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_regex: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub match_case: bool,
}

impl Client {
    fn query_url(&self, query_id: &str) -> Result<Url, ClientError> {
        let query_id = require("queryId", query_id)?;
        self.endpoint(&["v1", "queries", query_id])
    }

    pub async fn create_query(&self, query: &Query) -> Result<(), ClientError> {
        require("id", &query.id)?;
        let url = self.endpoint(&["v1", "queries"])?;
        self.write(Method::POST, url, query, "create query").await
    }

    /// Fetch a query by id. Returns `Ok(None)` when the query does not exist.
    pub async fn get_query(&self, query_id: &str) -> Result<Option<Query>, ClientError> {
        let url = self.query_url(query_id)?;
        tracing::trace!(query_id, "getting a query");

        match self
            .get_envelope::<GetQueryResponse>(url, "get query")
            .await?
        {
            None => Ok(None),
            Some(GetQueryResponse { query: Some(query) }) => Ok(Some(query)),
            Some(GetQueryResponse { query: None }) => {
                tracing::error!(query_id, "response did not contain a query");
                Err(ClientError::decode("response did not contain a query"))
            }
        }
    }

    pub async fn update_query(&self, query: &Query) -> Result<(), ClientError> {
        let url = self.query_url(&query.id)?;
        self.write(Method::PUT, url, query, "update query").await
    }

    pub async fn delete_query(&self, query_id: &str) -> Result<(), ClientError> {
        let url = self.query_url(query_id)?;
        tracing::trace!(query_id, "deleting a query");
        self.remove(url, "delete query").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_parameters_are_omitted() {
        let query = Query {
            id: "errors".into(),
            name: String::new(),
            description: "All errors".into(),
            service: "default".into(),
            parameters: QueryParameters::default(),
        };

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "errors",
                "description": "All errors",
                "service": "default",
                "parameters": {}
            })
        );
    }

    #[test]
    fn parameters_use_wire_names() {
        let params = QueryParameters {
            datasets: vec!["lambda-logs".into()],
            filter_combination: Some(FilterCombination::And),
            group_by: vec![QueryGroupBy {
                group_type: "string".into(),
                value: "message".into(),
            }],
            order_by: Some(QueryOrderBy {
                value: "count".into(),
                order: "DESC".into(),
            }),
            limit: 10,
            needle: Some(SearchNeedle {
                value: "error".into(),
                is_regex: true,
                match_case: false,
            }),
            ..QueryParameters::default()
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["filterCombination"], "AND");
        assert_eq!(value["groupBys"][0]["type"], "string");
        assert_eq!(value["orderBy"]["order"], "DESC");
        assert_eq!(value["limit"], 10);
        assert_eq!(value["needle"]["isRegex"], true);
        assert!(value["needle"].get("matchCase").is_none());
    }

    #[test]
    fn filter_combination_parses_only_known_values() {
        assert_eq!("AND".parse::<FilterCombination>(), Ok(FilterCombination::And));
        assert_eq!("OR".parse::<FilterCombination>(), Ok(FilterCombination::Or));
        assert!("and".parse::<FilterCombination>().is_err());
    }

    #[test]
    fn decodes_sparse_query_body() {
        let query: Query = serde_json::from_value(json!({
            "id": "errors",
            "parameters": { "datasets": ["lambda-logs"] }
        }))
        .unwrap();

        assert_eq!(query.parameters.datasets, vec!["lambda-logs".to_string()]);
        assert!(query.parameters.needle.is_none());
        assert_eq!(query.parameters.limit, 0);
    }
}
