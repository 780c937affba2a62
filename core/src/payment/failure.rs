// core/src/payment/failure.rs

//! User-facing reasons for gateway failure codes.

const GENERIC_FAILURE: &str = "알 수 없는 오류가 발생했습니다.";

/// Maps a gateway error code to the message shown to the shopper.
///
/// Unknown codes fall back to the gateway's own message, then to a generic text.
pub fn describe_failure(code: Option<&str>, gateway_message: Option<&str>) -> String {
  let known = match code {
    Some("USER_CANCEL") => Some("사용자가 결제를 취소했습니다."),
    Some("INVALID_CARD_NUMBER") => Some("잘못된 카드번호입니다."),
    Some("INVALID_EXPIRY") => Some("유효기간이 만료된 카드입니다."),
    Some("INVALID_CARD_PASSWORD") => Some("카드 비밀번호가 올바르지 않습니다."),
    Some("EXCEED_MAX_DAILY_PAYMENT_COUNT") => Some("일일 결제 한도를 초과했습니다."),
    Some("COMMON_ERROR") => Some("결제 처리 중 오류가 발생했습니다."),
    _ => None,
  };

  known
    .or_else(|| gateway_message.filter(|m| !m.trim().is_empty()))
    .unwrap_or(GENERIC_FAILURE)
    .to_string()
}
