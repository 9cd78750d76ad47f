//! Fixed prompt text sent with every consultation.
//!
//! The instructions are in Korean because the service answers Korean-speaking
//! patients; the model replies in the language of the instruction.

/// "You are a medical consultation expert. Please give accurate and
/// professional answers."
pub const MEDICAL_CONSULTANT: &str =
    "당신은 의료 상담 전문가입니다. 정확하고 전문적인 답변을 제공해주세요.";

/// [`MEDICAL_CONSULTANT`] plus "Write every answer in Korean."
pub const MEDICAL_CONSULTANT_KOREAN: &str =
    "당신은 의료 상담 전문가입니다. 정확하고 전문적인 답변을 제공해주세요. 모든 답변은 한글로 작성해주세요.";

/// Returned in place of a completion that came back empty or null.
///
/// "Sorry, an answer could not be generated. Please try again shortly."
pub const EMPTY_ANSWER_FALLBACK: &str =
    "죄송합니다. 답변을 생성하지 못했습니다. 잠시 후 다시 시도해주세요.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_variant_extends_base_prompt() {
        assert!(MEDICAL_CONSULTANT_KOREAN.starts_with(MEDICAL_CONSULTANT));
        assert!(MEDICAL_CONSULTANT_KOREAN.len() > MEDICAL_CONSULTANT.len());
    }

    #[test]
    fn fallback_is_not_blank() {
        assert!(!EMPTY_ANSWER_FALLBACK.trim().is_empty());
    }
}
