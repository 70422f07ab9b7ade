use serde::{Deserialize, Serialize};

use crate::client::queries as api;
use crate::provider::ResourceError;

use super::{require_non_empty, ResourceModel};

const KIND: &str = "query";

pub const DEFAULT_FILTER_COMBINATION: &str = "OR";
pub const DEFAULT_LIMIT: i64 = 50;
pub const DEFAULT_FILTER_TYPE: &str = "string";

fn default_filter_combination() -> String {
    DEFAULT_FILTER_COMBINATION.to_string()
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_filter_type() -> String {
    DEFAULT_FILTER_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub key: String,
    pub operation: String,
    pub value: String,
    #[serde(rename = "type", default = "default_filter_type")]
    pub filter_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNeedle {
    pub value: String,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub match_case: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOrderBy {
    pub value: String,
    pub order: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroupBy {
    #[serde(rename = "type")]
    pub group_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCalculation {
    pub key: String,
    pub operator: String,
    #[serde(default)]
    pub alias: String,
}

/// A saved query over one or more datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResourceModel {
    /// Computed; always equal to `name` once the query exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub service: String,
    pub datasets: Vec<String>,
    pub filters: Vec<QueryFilter>,
    #[serde(default = "default_filter_combination")]
    pub filter_combination: String,
    #[serde(default)]
    pub calculations: Vec<QueryCalculation>,
    #[serde(default)]
    pub group_by: Vec<QueryGroupBy>,
    #[serde(default)]
    pub order_by: Option<QueryOrderBy>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub needle: Option<SearchNeedle>,
}

impl QueryFilter {
    fn to_api_model(&self) -> api::QueryFilter {
        let filter_type = if self.filter_type.is_empty() {
            default_filter_type()
        } else {
            self.filter_type.clone()
        };

        api::QueryFilter {
            key: self.key.clone(),
            operation: self.operation.clone(),
            value: self.value.clone(),
            filter_type,
        }
    }
}

impl ResourceModel for QueryResourceModel {
    type Api = api::Query;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_api_model(&self) -> Result<api::Query, ResourceError> {
        require_non_empty(KIND, "name", &self.name)?;
        require_non_empty(KIND, "service", &self.service)?;

        let filter_combination = self
            .filter_combination
            .parse::<api::FilterCombination>()
            .map_err(|message| ResourceError::invalid_plan(KIND, message))?;

        if self.limit <= 0 {
            return Err(ResourceError::invalid_plan(
                KIND,
                format!("limit must be positive, got {}", self.limit),
            ));
        }

        Ok(api::Query {
            id: self.name.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            service: self.service.clone(),
            parameters: api::QueryParameters {
                datasets: self.datasets.clone(),
                filters: self.filters.iter().map(QueryFilter::to_api_model).collect(),
                filter_combination: Some(filter_combination),
                calculations: self
                    .calculations
                    .iter()
                    .map(|c| api::QueryCalculation {
                        key: c.key.clone(),
                        operator: c.operator.clone(),
                        alias: c.alias.clone(),
                    })
                    .collect(),
                group_by: self
                    .group_by
                    .iter()
                    .map(|g| api::QueryGroupBy {
                        group_type: g.group_type.clone(),
                        value: g.value.clone(),
                    })
                    .collect(),
                order_by: self.order_by.as_ref().map(|o| api::QueryOrderBy {
                    value: o.value.clone(),
                    order: o.order.clone(),
                }),
                limit: self.limit,
                needle: self.needle.as_ref().map(|n| api::SearchNeedle {
                    value: n.value.clone(),
                    is_regex: n.is_regex,
                    match_case: n.match_case,
                }),
            },
        })
    }

    fn from_api_model(query: &api::Query) -> Self {
        let params = &query.parameters;

        Self {
            id: Some(query.id.clone()),
            name: query.id.clone(),
            description: query.description.clone(),
            service: query.service.clone(),
            datasets: params.datasets.clone(),
            filters: params
                .filters
                .iter()
                .map(|f| QueryFilter {
                    key: f.key.clone(),
                    operation: f.operation.clone(),
                    value: f.value.clone(),
                    filter_type: f.filter_type.clone(),
                })
                .collect(),
            filter_combination: params
                .filter_combination
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(default_filter_combination),
            calculations: params
                .calculations
                .iter()
                .map(|c| QueryCalculation {
                    key: c.key.clone(),
                    operator: c.operator.clone(),
                    alias: c.alias.clone(),
                })
                .collect(),
            group_by: params
                .group_by
                .iter()
                .map(|g| QueryGroupBy {
                    group_type: g.group_type.clone(),
                    value: g.value.clone(),
                })
                .collect(),
            order_by: params.order_by.as_ref().map(|o| QueryOrderBy {
                value: o.value.clone(),
                order: o.order.clone(),
            }),
            limit: params.limit,
            needle: params.needle.as_ref().map(|n| SearchNeedle {
                value: n.value.clone(),
                is_regex: n.is_regex,
                match_case: n.match_case,
            }),
        }
    }
}
