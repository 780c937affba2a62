// storefront/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};

use ziben::ConfirmPaymentInput;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::OptionalSession;

/// `POST /api/payment/confirm`. Responds with the gateway's confirmation body as-is.
#[instrument(name = "handler::confirm_payment", skip(app_state, session, payload))]
pub async fn confirm_payment_handler(
  app_state: web::Data<AppState>,
  session: OptionalSession,
  payload: web::Json<ConfirmPaymentInput>,
) -> Result<HttpResponse, AppError> {
  let mut input = payload.into_inner();
  // A signed-in caller owns the order regardless of what the body claims.
  if let Some(claims) = session.0 {
    input.user_id = Some(claims.sub);
  }

  let confirmed = app_state.payments.confirm(input).await?;
  match &confirmed.recorded {
    Some(order) => info!(record_id = %order.id, "Payment confirmed and recorded."),
    None => warn!("Payment confirmed without an order record."),
  }

  Ok(HttpResponse::Ok().json(confirmed.payment.payload))
}
