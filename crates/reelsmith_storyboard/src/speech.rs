//! Narration speech-rate checks.

use reelsmith_core::{SpeechRateReport, SpeechRateSuggestion};

/// Slowest acceptable narration, characters per second.
pub const MIN_SPEECH_RATE: f64 = 2.5;
/// Fastest acceptable narration, characters per second.
pub const MAX_SPEECH_RATE: f64 = 5.5;

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{00A1}'..='\u{00BF}'
            | '\u{2000}'..='\u{206F}'
            | '\u{3000}'..='\u{303F}'
            | '\u{FE10}'..='\u{FE1F}'
            | '\u{FE30}'..='\u{FE4F}'
            | '\u{FF01}'..='\u{FF0F}'
            | '\u{FF1A}'..='\u{FF20}'
            | '\u{FF3B}'..='\u{FF40}'
            | '\u{FF5B}'..='\u{FF65}'
        )
}

/// Spoken characters: everything but whitespace and punctuation.
pub fn spoken_chars(text: &str) -> usize {
    text.chars()
        .filter(|&c| !c.is_whitespace() && !is_punctuation(c))
        .count()
}

/// Check narration length against clip duration with the default bounds.
///
/// # Examples
///
/// ```
/// use reelsmith_core::SpeechRateSuggestion;
/// use reelsmith_storyboard::validate_speech_rate;
///
/// assert!(validate_speech_rate(&"x".repeat(25), 5).valid);
///
/// let report = validate_speech_rate(&"x".repeat(40), 5);
/// assert!(!report.valid);
/// assert_eq!(report.suggestion, Some(SpeechRateSuggestion::TooFast { max_chars: 27 }));
/// ```
pub fn validate_speech_rate(text: &str, duration: u32) -> SpeechRateReport {
    validate_speech_rate_within(text, duration, MIN_SPEECH_RATE, MAX_SPEECH_RATE)
}

/// Check narration length against clip duration with explicit bounds.
///
/// A zero-second clip can hold no narration and always reports too fast.
pub fn validate_speech_rate_within(
    text: &str,
    duration: u32,
    min_rate: f64,
    max_rate: f64,
) -> SpeechRateReport {
    let char_count = spoken_chars(text);
    if duration == 0 {
        return SpeechRateReport {
            char_count,
            rate: 0.0,
            valid: false,
            suggestion: Some(SpeechRateSuggestion::TooFast { max_chars: 0 }),
        };
    }

    let seconds = f64::from(duration);
    let rate = char_count as f64 / seconds;
    let suggestion = if rate < min_rate {
        Some(SpeechRateSuggestion::TooSlow {
            min_chars: (min_rate * seconds).ceil() as u32,
        })
    } else if rate > max_rate {
        Some(SpeechRateSuggestion::TooFast {
            max_chars: (max_rate * seconds).floor() as u32,
        })
    } else {
        None
    };

    SpeechRateReport {
        char_count,
        rate,
        valid: suggestion.is_none(),
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_and_whitespace_not_counted() {
        assert_eq!(spoken_chars("林默：“我回来了！” 他说。"), 8);
        assert_eq!(spoken_chars("Hi, Lin... ok?"), 7);
        assert_eq!(spoken_chars("　——……"), 0);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_speech_rate(&"字".repeat(25), 10).valid);
        assert!(validate_speech_rate(&"字".repeat(55), 10).valid);
        assert!(!validate_speech_rate(&"字".repeat(24), 10).valid);
        assert!(!validate_speech_rate(&"字".repeat(56), 10).valid);
    }

    #[test]
    fn slow_narration_suggests_minimum() {
        let report = validate_speech_rate("短", 15);
        assert_eq!(report.char_count, 1);
        assert_eq!(
            report.suggestion,
            Some(SpeechRateSuggestion::TooSlow { min_chars: 38 })
        );
    }

    #[test]
    fn zero_duration_is_too_fast() {
        let report = validate_speech_rate("", 0);
        assert!(!report.valid);
        assert_eq!(
            report.suggestion,
            Some(SpeechRateSuggestion::TooFast { max_chars: 0 })
        );
    }

    #[test]
    fn custom_bounds() {
        let report = validate_speech_rate_within(&"x".repeat(30), 5, 2.0, 7.0);
        assert!(report.valid);
        assert_eq!(report.rate, 6.0);
    }
}
