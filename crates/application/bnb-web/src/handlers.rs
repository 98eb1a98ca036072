//! Route handlers

use askama::Template;
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use bnb_core::{query, validate_price_range, PropertyId, QueryError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;
use crate::templates::*;
use crate::views::{self, current_year, PropertyView};

// ============== Errors ==============

/// Everything a page handler can fail with, rendered as the error page
#[derive(Debug)]
pub enum AppError {
    Query(QueryError),
    /// Name search ran but matched nothing
    NoResults,
    Dataset(bnb_dataset::Error),
    Render(askama::Error),
    RouteNotFound,
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Query(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Render(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Query(QueryError::InvalidIndex | QueryError::EmptyQuery) => StatusCode::BAD_REQUEST,
            AppError::Query(QueryError::NotFound) | AppError::NoResults | AppError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Dataset(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(&self) -> ErrorPage {
        match self {
            AppError::Query(QueryError::NotFound) => ErrorPage::new("Not Found", QueryError::NotFound.to_string()),
            AppError::Query(e) => ErrorPage::new("Error", e.to_string()),
            AppError::NoResults => ErrorPage::new("No Results", "No properties found."),
            AppError::Dataset(_) => ErrorPage::new(
                "Dataset Unavailable",
                "The property data could not be loaded. Please try again later.",
            ),
            AppError::Render(_) => ErrorPage::new("Error", "Something went wrong rendering this page."),
            AppError::RouteNotFound => ErrorPage::new("Error", "Wrong Route or Page Not Found"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Dataset(e) => tracing::error!("dataset load failed: {}", e),
            AppError::Render(e) => tracing::error!("template render failed: {}", e),
            _ => tracing::debug!("request rejected: {:?}", self),
        }

        let status = self.status();
        match self.page().render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, status.canonical_reason().unwrap_or("Error")).into_response(),
        }
    }
}

type PageResult = Result<Html<String>, AppError>;

fn render<T: Template>(page: T) -> PageResult {
    Ok(Html(page.render()?))
}

// ============== Pages ==============

/// Home page
pub async fn index(State(state): State<Arc<AppState>>) -> PageResult {
    let total = state.store.current().await.map(|s| s.len());
    render(IndexPage {
        title: "Airbnb Listings".into(),
        year: current_year(),
        total,
    })
}

pub async fn users() -> &'static str {
    "respond with a resource"
}

/// Every listing as cards
pub async fn all_data(State(state): State<Arc<AppState>>) -> PageResult {
    let snapshot = state.snapshot().await?;
    render(AllDataPage {
        title: "All Airbnb Properties".into(),
        year: current_year(),
        properties: views::positioned(query::list_all(&snapshot)),
    })
}

/// One listing by position
pub async fn property_at(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> PageResult {
    let snapshot = state.snapshot().await?;
    let (position, property) = query::locate(&snapshot, &index)?;

    render(PropertyPage {
        title: "Property Details".into(),
        year: current_year(),
        property: PropertyView::at(position, property),
    })
}

pub async fn search_id_form() -> PageResult {
    render(SearchIdPage {
        title: "Search by ID".into(),
        year: current_year(),
    })
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

pub async fn search_id_result(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> PageResult {
    let snapshot = state.snapshot().await?;
    let id = q.id.map(PropertyId::from);
    let property = query::find_by_id(&snapshot, id.as_ref())?;

    render(PropertyPage {
        title: "Property Found".into(),
        year: current_year(),
        property: PropertyView::from(property),
    })
}

pub async fn search_name_form() -> PageResult {
    render(SearchNamePage {
        title: "Search by Name".into(),
        year: current_year(),
    })
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

pub async fn search_name_result(
    State(state): State<Arc<AppState>>,
    Query(q): Query<NameQuery>,
) -> PageResult {
    let name = q.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(QueryError::EmptyQuery.into());
    }

    let snapshot = state.snapshot().await?;
    let results = query::search_by_name(&snapshot, &name)?;
    if results.is_empty() {
        return Err(AppError::NoResults);
    }
    tracing::debug!(query = %name, matches = results.len(), "name search");

    render(SearchNameResultPage {
        title: "Search Results".into(),
        year: current_year(),
        query: name,
        results: views::listed(&results),
    })
}

/// Plain table of every listing
pub async fn view_data(State(state): State<Arc<AppState>>) -> PageResult {
    let snapshot = state.snapshot().await?;
    render(ViewDataPage {
        title: "View Data".into(),
        year: current_year(),
        clean: false,
        properties: views::positioned(query::list_all(&snapshot)),
    })
}

/// Table with blank service fees filled in and highlighted
pub async fn view_data_clean(State(state): State<Arc<AppState>>) -> PageResult {
    let snapshot = state.snapshot().await?;
    render(ViewDataPage {
        title: "Cleaned Data".into(),
        year: current_year(),
        clean: true,
        properties: views::positioned(query::list_all(&snapshot)),
    })
}

pub async fn price_form() -> PageResult {
    render(PriceFormPage::blank())
}

/// Raw `min`/`max` form values.
///
/// A field given more than once keeps every value joined with `,`, which
/// then fails validation like any other non-number.
#[derive(Debug, Default, PartialEq)]
pub struct PriceQuery {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl PriceQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut q = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "min" => &mut q.min,
                "max" => &mut q.max,
                _ => continue,
            };
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value.into_owned()),
            }
        }
        q
    }
}

/// Validate the range first; on failure redisplay the form with every error.
pub async fn price_result(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let q = PriceQuery::parse(raw.as_deref());
    let range = match validate_price_range(q.min.as_deref(), q.max.as_deref()) {
        Ok(range) => range,
        Err(errors) => {
            tracing::debug!("price range rejected: {}", errors);
            let page = PriceFormPage {
                errors: errors.0,
                min: q.min.unwrap_or_default(),
                max: q.max.unwrap_or_default(),
                ..PriceFormPage::blank()
            };
            return Ok((StatusCode::BAD_REQUEST, Html(page.render()?)).into_response());
        }
    };

    let snapshot = state.snapshot().await?;
    let found = query::filter_by_price(&snapshot, &range);

    let page = PriceResultPage {
        title: "Price Range Results".into(),
        year: current_year(),
        min: range.min,
        max: range.max,
        properties: views::listed(&found),
    };
    Ok(Html(page.render()?).into_response())
}

/// Fallback for unknown routes and missing static files
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}

// ============== API ==============

/// Health check
pub async fn api_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let properties = state.store.current().await.map(|s| s.len());
    Json(json!({
        "status": "ok",
        "source": state.store.describe(),
        "refresh": state.refresh,
        "properties": properties,
        "loaded_at": state.store.loaded_at().await,
        "stats": state.store.stats().await,
        "uptime_secs": (chrono::Utc::now() - state.started_at).num_seconds(),
    }))
}

/// Current snapshot as JSON
pub async fn api_properties(State(state): State<Arc<AppState>>) -> Response {
    match state.snapshot().await {
        Ok(snapshot) => Json(query::list_all(&snapshot)).into_response(),
        Err(AppError::Dataset(e)) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Force a reload regardless of refresh policy
pub async fn admin_reload(State(state): State<Arc<AppState>>) -> Response {
    match state.store.reload().await {
        Ok(snapshot) => Json(json!({ "reloaded": snapshot.len() })).into_response(),
        Err(e) => {
            tracing::warn!("manual reload failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_query_parse() {
        let q = PriceQuery::parse(Some("min=10&max=%2420&other=x"));
        assert_eq!(q.min.as_deref(), Some("10"));
        assert_eq!(q.max.as_deref(), Some("$20"));

        assert_eq!(PriceQuery::parse(None), PriceQuery::default());
    }

    #[test]
    fn test_price_query_repeated_field() {
        let q = PriceQuery::parse(Some("min=1&min=2&max=3"));
        assert_eq!(q.min.as_deref(), Some("1,2"));
        assert_eq!(q.max.as_deref(), Some("3"));
    }
}
