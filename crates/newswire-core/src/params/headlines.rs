use serde::Deserialize;

use super::{Endpoint, ParamSet, QueryPairs};
use crate::error::AppError;

/// Request parameters for the `top-headlines` endpoint.
///
/// `sources` cannot be mixed with `country` or `category`, and at least one
/// of the four must be set.
/// See <https://newsapi.org/docs/endpoints/top-headlines>.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct HeadlinesParams {
    /// 2-letter ISO 3166-1 code of the country.
    pub country: String,
    pub category: String,
    /// Comma-separated news source ids.
    pub sources: String,
    pub query: String,
    pub page_size: u32,
    pub page: u32,
}

impl HeadlinesParams {
    const REQUIRED: &'static str = "sources, query, country, category";
}

impl ParamSet for HeadlinesParams {
    fn endpoint(&self) -> Endpoint {
        Endpoint::TopHeadlines
    }

    fn encode(&self) -> Result<String, AppError> {
        let mut q = QueryPairs::new();
        q.push("q", self.query.as_str());
        q.push("sources", self.sources.as_str());

        let has_sources = !self.sources.is_empty();
        if !self.country.is_empty() {
            if has_sources {
                return Err(AppError::MixedExclusiveParams("country"));
            }
            q.push("country", self.country.as_str());
        }
        if !self.category.is_empty() {
            if has_sources {
                return Err(AppError::MixedExclusiveParams("category"));
            }
            q.push("category", self.category.as_str());
        }

        if q.is_empty() {
            return Err(AppError::NoRequiredParams(Self::REQUIRED));
        }

        q.paginate(self.page, self.page_size)?;
        Ok(q.finish())
    }
}
