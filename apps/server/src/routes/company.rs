//! # Company Info Handlers

use axum::extract::State;
use axum::Json;
use tracing::info;
use uriage_core::company::CompanyInfo;

use crate::error::ApiResult;
use crate::state::SharedState;

pub async fn get_company_info(State(state): State<SharedState>) -> Json<CompanyInfo> {
    Json(state.company().read().await.clone())
}

/// Replaces company info and writes it to the settings file.
pub async fn update_company_info(
    State(state): State<SharedState>,
    Json(company): Json<CompanyInfo>,
) -> ApiResult<Json<CompanyInfo>> {
    company.validate()?;

    state.replace_company(company.clone()).await?;
    info!(name = %company.name, "Company info updated");

    Ok(Json(company))
}
