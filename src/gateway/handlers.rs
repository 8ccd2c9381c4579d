use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{instrument, warn};

use super::operations::{DataEnvelope, GatewayRequest, Operation, OperationData, HELLO};
use crate::{
    auth::{extractors::BearerToken, services},
    error::AuthError,
    state::AppState,
};

/// Single entry point for every operation. No operation requires prior
/// authentication.
#[instrument(skip_all)]
pub async fn execute(
    State(state): State<AppState>,
    BearerToken(bearer): BearerToken,
    payload: Result<Json<GatewayRequest>, JsonRejection>,
) -> Result<Json<DataEnvelope>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "malformed request body");
        AuthError::InvalidInput(rejection.body_text())
    })?;

    let data = match request.into_operation()? {
        Operation::Hello => OperationData::Hello(HELLO),
        Operation::SignupUser(input) => OperationData::SignupUser(services::signup(&state, input).await?),
        Operation::LoginUser(input) => OperationData::LoginUser(services::login(&state, input).await?),
        Operation::LogoutUser(input) => {
            let token = input
                .token
                .filter(|t| !t.trim().is_empty())
                .or(bearer);
            OperationData::LogoutUser(services::logout(&state, token.as_deref()).await?)
        }
    };

    Ok(Json(DataEnvelope { data }))
}
