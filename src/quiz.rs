use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SpellError};
use crate::session::{ButtonEnablement, SessionState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { expected: String },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// How the answer reached us; spoken answers are normalized a little harder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    Typed,
    Spoken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub verdict: Verdict,
    /// The answer after normalization
    pub submitted: String,
    pub source: AnswerSource,
}

/// Result of a show/hide toggle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reveal {
    Shown(String),
    Hidden,
    /// No current word, nothing changed
    Unchanged,
}

pub fn normalize_answer(submitted: &str, source: AnswerSource) -> String {
    let trimmed = submitted.trim();
    match source {
        AnswerSource::Typed => trimmed.to_lowercase(),
        AnswerSource::Spoken => trimmed.replace('.', "").to_lowercase(),
    }
}

/// Map a uniform draw in [0, 1) onto an index in `0..len`
fn index_for(unit: f64, len: usize) -> usize {
    ((unit * len as f64).floor() as usize).min(len - 1)
}

/// The per-word state transitions: draw, check, reveal.
pub struct QuizEngine<R: Rng = ThreadRng> {
    rng: R,
}

impl QuizEngine<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for QuizEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Pick a word uniformly at random and make it the current word.
    ///
    /// The word is hidden again after every draw.
    pub fn draw_random_word(
        &mut self,
        session: &mut SessionState,
        words: &[String],
    ) -> Result<String> {
        if words.is_empty() {
            return Err(SpellError::EmptyList(session.current_list_name.clone()));
        }
        let unit: f64 = self.rng.gen();
        let word = words[index_for(unit, words.len())].clone();
        debug!(list = %session.current_list_name, "drew a word");

        session.current_word = Some(word.clone());
        session.is_word_revealed = false;
        Ok(word)
    }

    pub fn check_answer(
        &self,
        session: &SessionState,
        submitted: &str,
        source: AnswerSource,
    ) -> Result<CheckResult> {
        let current = session
            .current_word
            .as_deref()
            .ok_or(SpellError::NoActiveWord)?;
        let submitted = normalize_answer(submitted, source);
        let verdict = if submitted == current {
            Verdict::Correct
        } else {
            Verdict::Incorrect {
                expected: current.to_string(),
            }
        };
        debug!(correct = verdict.is_correct(), ?source, "checked answer");

        Ok(CheckResult {
            verdict,
            submitted,
            source,
        })
    }

    pub fn toggle_reveal(&self, session: &mut SessionState) -> Reveal {
        let Some(word) = session.current_word.as_deref() else {
            return Reveal::Unchanged;
        };
        session.is_word_revealed = !session.is_word_revealed;
        if session.is_word_revealed {
            Reveal::Shown(word.to_string())
        } else {
            Reveal::Hidden
        }
    }

    /// The word to say again at the slow rate
    pub fn replay_word<'s>(&self, session: &'s SessionState) -> Result<&'s str> {
        session
            .current_word
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .ok_or(SpellError::NoActiveWord)
    }

    pub fn button_enablement(&self, session: &SessionState) -> ButtonEnablement {
        session.button_enablement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn session_with(word: &str) -> SessionState {
        let mut session = SessionState::new("test");
        session.current_word = Some(word.to_string());
        session
    }

    #[test]
    fn draw_from_empty_list_fails() {
        let mut engine = QuizEngine::new();
        let mut session = SessionState::new("empty");
        assert_matches!(
            engine.draw_random_word(&mut session, &[]),
            Err(SpellError::EmptyList(name)) if name == "empty"
        );
        assert_eq!(session.current_word, None);
    }

    #[test]
    fn draw_maps_unit_interval_onto_index() {
        assert_eq!(index_for(0.0, 3), 0);
        assert_eq!(index_for(0.34, 3), 1);
        assert_eq!(index_for(0.999_999, 3), 2);
        assert_eq!(index_for(1.0, 3), 2);
    }

    #[test]
    fn draw_with_mock_rng_is_deterministic() {
        // 2^63 becomes 0.5, the middle of three words
        let mut engine = QuizEngine::with_rng(StepRng::new(1 << 63, 0));
        let mut session = SessionState::new("animals");
        session.is_word_revealed = true;

        let word = engine
            .draw_random_word(&mut session, &words(&["dog", "cat", "bird"]))
            .unwrap();

        assert_eq!(word, "cat");
        assert_eq!(session.current_word.as_deref(), Some("cat"));
        assert!(!session.is_word_revealed);
    }

    #[test]
    fn draw_always_returns_member_of_list() {
        let list = words(&["a", "b", "c", "d", "e"]);
        let mut engine = QuizEngine::new();
        let mut session = SessionState::new("x");
        for _ in 0..500 {
            let w = engine.draw_random_word(&mut session, &list).unwrap();
            assert!(list.contains(&w));
        }
    }

    #[test]
    fn draw_distribution_is_uniform() {
        let list = words(&["one", "two", "three", "four"]);
        let mut engine = QuizEngine::with_rng(StdRng::seed_from_u64(42));
        let mut session = SessionState::new("x");
        let draws = 40_000;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            let w = engine.draw_random_word(&mut session, &list).unwrap();
            *counts.entry(w).or_insert(0) += 1;
        }

        let expected = draws as f64 / list.len() as f64;
        let chi_square: f64 = list
            .iter()
            .map(|w| {
                let observed = *counts.get(w).unwrap_or(&0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();

        // critical value for 3 degrees of freedom at p = 0.001
        assert!(chi_square < 16.27, "chi-square too large: {chi_square}");
    }

    #[test]
    fn check_answer_ignores_case_and_whitespace() {
        let engine = QuizEngine::new();
        let session = session_with("cat");

        let result = engine
            .check_answer(&session, "  Cat ", AnswerSource::Typed)
            .unwrap();

        assert_eq!(result.verdict, Verdict::Correct);
        assert_eq!(result.submitted, "cat");
    }

    #[test]
    fn check_answer_reports_expected_word() {
        let engine = QuizEngine::new();
        let session = session_with("cat");

        let result = engine
            .check_answer(&session, "kat", AnswerSource::Typed)
            .unwrap();

        assert_eq!(
            result.verdict,
            Verdict::Incorrect {
                expected: "cat".into()
            }
        );
    }

    #[test]
    fn check_answer_without_word_fails() {
        let engine = QuizEngine::new();
        let session = SessionState::new("x");
        assert_matches!(
            engine.check_answer(&session, "cat", AnswerSource::Typed),
            Err(SpellError::NoActiveWord)
        );
    }

    #[test]
    fn check_answer_is_repeatable() {
        let engine = QuizEngine::new();
        let session = session_with("cat");
        for _ in 0..3 {
            let r = engine.check_answer(&session, "dog", AnswerSource::Typed);
            assert!(!r.unwrap().verdict.is_correct());
        }
        assert_eq!(session.current_word.as_deref(), Some("cat"));
    }

    #[test]
    fn spoken_answers_drop_periods() {
        let engine = QuizEngine::new();
        let session = session_with("cat");

        let spoken = engine
            .check_answer(&session, " Cat. ", AnswerSource::Spoken)
            .unwrap();
        assert!(spoken.verdict.is_correct());
        assert_eq!(spoken.source, AnswerSource::Spoken);

        let typed = engine
            .check_answer(&session, "cat.", AnswerSource::Typed)
            .unwrap();
        assert!(!typed.verdict.is_correct());
    }

    #[test]
    fn toggle_reveal_flips_and_shows_word() {
        let engine = QuizEngine::new();
        let mut session = session_with("cat");

        assert_eq!(engine.toggle_reveal(&mut session), Reveal::Shown("cat".into()));
        assert!(session.is_word_revealed);
        assert_eq!(engine.toggle_reveal(&mut session), Reveal::Hidden);
        assert!(!session.is_word_revealed);
    }

    #[test]
    fn toggle_reveal_without_word_is_noop() {
        let engine = QuizEngine::new();
        let mut session = SessionState::new("x");
        assert_eq!(engine.toggle_reveal(&mut session), Reveal::Unchanged);
        assert!(!session.is_word_revealed);
    }

    #[test]
    fn replay_needs_a_word() {
        let engine = QuizEngine::new();
        assert_matches!(
            engine.replay_word(&SessionState::new("x")),
            Err(SpellError::NoActiveWord)
        );
        assert_eq!(engine.replay_word(&session_with("cat")).unwrap(), "cat");
        assert!(engine.button_enablement(&session_with("cat")).replay);
    }
}
