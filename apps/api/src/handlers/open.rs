//! Public surface: issuer verification and the cross-institute Aadhar search.

use axum::Json;
use axum::extract::{Path, Query, State};
use pratibha_domain::AadharNumber;
use serde::Deserialize;

use crate::dto::{
    GenericMessageResponse, IssuerSessionResponse, IssuerVerifyRequest, SearchResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IssuerSessionQuery {
    pub token: String,
}

/// GET /api/open/issuer/session?token= - Look up an issuer session.
pub async fn issuer_session_handler(
    State(state): State<AppState>,
    Query(query): Query<IssuerSessionQuery>,
) -> ApiResult<Json<IssuerSessionResponse>> {
    let view = state.activity_service.issuer_session(&query.token).await?;

    Ok(Json(IssuerSessionResponse::from(view)))
}

/// POST /api/open/issuer/verify - Confirm a credential ID against a session.
pub async fn issuer_verify_handler(
    State(state): State<AppState>,
    Json(payload): Json<IssuerVerifyRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .activity_service
        .verify_issuer(&payload.token, &payload.credential_id)
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "credential verified successfully".to_owned(),
    }))
}

/// GET /api/open/search/{aadhar} - Cross-institute record lookup.
pub async fn aadhar_search_handler(
    State(state): State<AppState>,
    Path(aadhar): Path<String>,
) -> ApiResult<Json<SearchResponse>> {
    let aadhar = AadharNumber::new(aadhar)?;
    let result = state.search_service.search(&aadhar).await?;

    Ok(Json(SearchResponse::from(result)))
}
