use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use postlens_analytics::{
    render, AnalyticsError, DashboardParams, DashboardView, Language, SearchField,
};
use postlens_core::{Dataset, Platform};
use postlens_query::MatchOptions;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta, ServerDefaults};

/// Query string of `GET /api/v1/dashboard`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub(super) struct DashboardQuery {
    pub telegram: Option<String>,
    pub twitter: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub language: Option<String>,
    pub telegram_field: Option<String>,
    pub twitter_field: Option<String>,
    pub ignore_case: Option<bool>,
    pub ignore_accent: Option<bool>,
    pub match_word: Option<bool>,
    pub rolling: Option<String>,
    pub rank_by: Option<String>,
    /// Ranked posts per platform; `0` means unlimited.
    pub limit: Option<usize>,
}

impl DashboardQuery {
    pub(super) fn to_params(
        &self,
        dataset: &Dataset,
        defaults: ServerDefaults,
    ) -> Result<DashboardParams, AnalyticsError> {
        let base = DashboardParams::default();

        let date_range = DashboardParams::resolve_range(dataset, self.from, self.to)?;

        let mut queries = base.queries;
        for (platform, query) in [
            (Platform::Telegram, &self.telegram),
            (Platform::Twitter, &self.twitter),
        ] {
            if let Some(query) = query {
                queries.insert(platform, query.clone());
            }
        }

        let mut field_overrides = BTreeMap::new();
        for (platform, field) in [
            (Platform::Telegram, &self.telegram_field),
            (Platform::Twitter, &self.twitter_field),
        ] {
            if let Some(field) = field {
                field_overrides.insert(platform, field.parse::<SearchField>()?);
            }
        }

        let language: Language = self
            .language
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or_default();

        let defaults_options = MatchOptions::default();
        Ok(DashboardParams {
            queries,
            date_range,
            language,
            field_overrides,
            match_options: MatchOptions {
                ignore_case: self.ignore_case.unwrap_or(defaults_options.ignore_case),
                ignore_accent: self.ignore_accent.unwrap_or(defaults_options.ignore_accent),
                match_word: self.match_word.unwrap_or(defaults_options.match_word),
            },
            bucket_width: match &self.rolling {
                Some(rolling) => rolling.parse()?,
                None => defaults.bucket_width,
            },
            rank_by: match &self.rank_by {
                Some(metric) => metric.parse()?,
                None => base.rank_by,
            },
            rank_limit: match self.limit {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.rank_limit,
            },
        })
    }
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;
    let params = query
        .to_params(&state.dataset, state.defaults)
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;

    let dataset = Arc::clone(&state.dataset);
    let palette = Arc::clone(&state.palette);
    let view = tokio::task::spawn_blocking(move || render(&dataset, &params, palette.as_ref()))
        .await
        .map_err(|error| {
            tracing::error!(error = %error, "dashboard render task failed");
            ApiError::new(req_id.0.clone(), "internal_error", "dashboard render failed")
        })?;

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}
