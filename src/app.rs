use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::config::{Config, ListMode};
use crate::error::{Result, SpellError};
use crate::quiz::{AnswerSource, CheckResult, QuizEngine, Reveal, Verdict};
use crate::session::{ButtonEnablement, SessionState};
use crate::speech::{ListenRequest, ListenToken, SpeechRate, SpeechService, Transcript, Utterance};
use crate::word_list_store::WordLists;

pub const PLAY_WORD_LABEL: &str = "Play Word";
pub const SKIP_WORD_LABEL: &str = "Next Word";
pub const SHOW_WORD_LABEL: &str = "Show Word";
pub const HIDE_WORD_LABEL: &str = "Hide Word";

/// Where finished listen sessions are delivered, usually the event loop
pub type TranscriptSink = Arc<dyn Fn(Transcript) + Send + Sync>;

/// A user gesture, as raised by the presentation layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    SelectList(String),
    NextList,
    PreviousList,
    SaveWords(String),
    ResetList,
    CreateList(String),
    DeleteList,
    PlayWord,
    ReplayWord,
    ToggleReveal,
    CheckAnswer(String),
    SpeakAnswer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// green
    Success,
    /// red
    Failure,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Input fields the presentation must overwrite after an intent
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Refresh {
    pub answer: Option<String>,
}

impl Refresh {
    fn clear_answer() -> Self {
        Self {
            answer: Some(String::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub label: String,
    pub is_builtin: bool,
    pub selected: bool,
}

/// Everything the presentation needs to draw one frame
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub list_mode: ListMode,
    pub lists: Vec<ListEntry>,
    pub current_list: String,
    pub current_label: String,
    pub editor_text: String,
    pub word_count: usize,
    pub can_reset: bool,
    pub can_delete: bool,
    pub play_label: &'static str,
    pub buttons: ButtonEnablement,
    pub revealed_word: Option<String>,
    pub reveal_label: &'static str,
    pub result: Option<Message>,
    pub notice: Option<Message>,
    pub listening: bool,
}

fn result_message(check: &CheckResult) -> Message {
    match (&check.verdict, check.source) {
        (Verdict::Correct, AnswerSource::Typed) => Message::new(Tone::Success, "Correct!"),
        (Verdict::Correct, AnswerSource::Spoken) => {
            Message::new(Tone::Success, "Correct (spoken)!")
        }
        (Verdict::Incorrect { expected }, AnswerSource::Typed) => {
            Message::new(Tone::Failure, format!("Wrong! It was: {expected}"))
        }
        (Verdict::Incorrect { expected }, AnswerSource::Spoken) => Message::new(
            Tone::Failure,
            format!("You said: \"{}\", it was: {expected}", check.submitted),
        ),
    }
}

/// Owns the word lists, the quiz session and the speech service, and performs
/// one state transition per intent.
pub struct App {
    lists: Box<dyn WordLists>,
    session: SessionState,
    quiz: QuizEngine<Box<dyn RngCore>>,
    speech: Box<dyn SpeechService>,
    config: Config,
    sink: TranscriptSink,
    result: Option<Message>,
    notice: Option<Message>,
    played: bool,
    pending_listen: Option<ListenToken>,
    next_token: u64,
}

impl App {
    pub fn new(
        lists: Box<dyn WordLists>,
        speech: Box<dyn SpeechService>,
        config: Config,
        sink: TranscriptSink,
    ) -> Self {
        Self::with_rng(lists, speech, config, sink, Box::new(rand::thread_rng()))
    }

    pub fn with_rng(
        lists: Box<dyn WordLists>,
        speech: Box<dyn SpeechService>,
        config: Config,
        sink: TranscriptSink,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let session = SessionState::new(lists.default_list_name());
        Self {
            lists,
            session,
            quiz: QuizEngine::with_rng(rng),
            speech,
            config,
            sink,
            result: None,
            notice: None,
            played: false,
            pending_listen: None,
            next_token: 0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn lists(&self) -> &dyn WordLists {
        self.lists.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pending_listen(&self) -> Option<ListenToken> {
        self.pending_listen
    }

    /// Apply one intent. Failures become the notice of the next frame.
    pub fn handle(&mut self, intent: Intent) -> Refresh {
        self.notice = None;
        debug!(?intent, "handling intent");
        match self.apply(intent) {
            Ok(refresh) => refresh,
            Err(e) => {
                warn!(error = %e, "intent failed");
                self.notice = Some(Message::new(Tone::Failure, e.to_string()));
                Refresh::default()
            }
        }
    }

    fn apply(&mut self, intent: Intent) -> Result<Refresh> {
        match intent {
            Intent::SelectList(name) => self.select_list(&name),
            Intent::NextList => self.step_list(1),
            Intent::PreviousList => self.step_list(-1),
            Intent::SaveWords(text) => self.save_words(&text),
            Intent::ResetList => self.reset_list(),
            Intent::CreateList(name) => {
                let created = self.lists.create(&name)?;
                self.switch_to(created);
                Ok(Refresh::clear_answer())
            }
            Intent::DeleteList => {
                let fallback = self.lists.delete(&self.session.current_list_name)?;
                self.switch_to(fallback);
                self.notice = Some(Message::new(Tone::Success, "List deleted!"));
                Ok(Refresh::clear_answer())
            }
            Intent::PlayWord => self.play_word(),
            Intent::ReplayWord => self.replay_word(),
            Intent::ToggleReveal => {
                if let Reveal::Shown(_) = self.quiz.toggle_reveal(&mut self.session) {
                    debug!("word revealed");
                }
                Ok(Refresh::default())
            }
            Intent::CheckAnswer(text) => {
                let check = self
                    .quiz
                    .check_answer(&self.session, &text, AnswerSource::Typed)?;
                self.result = Some(result_message(&check));
                Ok(Refresh::default())
            }
            Intent::SpeakAnswer => self.start_listening(),
        }
    }

    fn select_list(&mut self, name: &str) -> Result<Refresh> {
        if !self.lists.contains(name) {
            return Err(SpellError::UnknownList(name.to_string()));
        }
        self.switch_to(name.to_string());
        Ok(Refresh::clear_answer())
    }

    fn step_list(&mut self, delta: isize) -> Result<Refresh> {
        let names: Vec<String> = self.lists.ordered_lists().into_iter().map(|l| l.name).collect();
        let current = names
            .iter()
            .position(|n| *n == self.session.current_list_name)
            .unwrap_or(0) as isize;
        let len = names.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.select_list(&names[next])
    }

    /// Make `name` active and start the per-word interaction over
    fn switch_to(&mut self, name: String) {
        info!(list = %name, "switched word list");
        self.session.switch_list(name);
        self.forget_word_state();
    }

    fn forget_word_state(&mut self) {
        self.result = None;
        self.played = false;
        self.drop_pending_listen();
    }

    fn drop_pending_listen(&mut self) {
        if let Some(token) = self.pending_listen.take() {
            debug!(token = token.0, "cancelling listen session");
            self.speech.cancel_listen();
        }
    }

    fn save_words(&mut self, text: &str) -> Result<Refresh> {
        let name = self.session.current_list_name.clone();
        self.lists.save(&name, text)?;
        self.notice = Some(Message::new(
            Tone::Success,
            format!("Word list \"{name}\" saved!"),
        ));
        Ok(Refresh::default())
    }

    fn reset_list(&mut self) -> Result<Refresh> {
        let name = self.session.current_list_name.clone();
        self.lists.reset(&name)?;
        self.session.clear_word();
        self.forget_word_state();
        self.notice = Some(Message::new(
            Tone::Success,
            format!("\"{}\" reset to original words!", self.lists.label(&name)),
        ));
        Ok(Refresh::clear_answer())
    }

    fn play_word(&mut self) -> Result<Refresh> {
        let name = self.session.current_list_name.clone();
        let words = self
            .lists
            .words(&name)
            .ok_or_else(|| SpellError::UnknownList(name.clone()))?;
        let word = match self.quiz.draw_random_word(&mut self.session, words) {
            Ok(word) => word,
            Err(e) => {
                self.session.clear_word();
                return Err(e);
            }
        };
        self.result = None;
        self.played = true;
        self.drop_pending_listen();

        // the word stays drawn even if it couldn't be spoken
        if let Err(e) = self.say(&word, SpeechRate::Normal) {
            warn!(error = %e, "could not speak word");
            self.notice = Some(Message::new(Tone::Failure, e.to_string()));
        }
        Ok(Refresh::clear_answer())
    }

    fn replay_word(&mut self) -> Result<Refresh> {
        if !self.session.button_enablement().replay {
            return Ok(Refresh::default());
        }
        let word = self.quiz.replay_word(&self.session)?.to_string();
        self.say(&word, SpeechRate::Slow)?;
        Ok(Refresh::default())
    }

    fn say(&mut self, text: &str, rate: SpeechRate) -> Result<()> {
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.config.rate(rate),
            locale: self.config.locale.clone(),
        };
        debug!(%rate, "speaking current word");
        self.speech.speak(&utterance)
    }

    fn start_listening(&mut self) -> Result<Refresh> {
        if !self.session.has_word() {
            return Err(SpellError::NoActiveWord);
        }
        self.next_token += 1;
        let token = ListenToken(self.next_token);
        // a newer session supersedes whatever is still pending
        if let Some(stale) = self.pending_listen.replace(token) {
            debug!(stale = stale.0, token = token.0, "superseding listen session");
        }

        let request = ListenRequest {
            token,
            locale: self.config.locale.clone(),
        };
        let sink = Arc::clone(&self.sink);
        if let Err(e) = self
            .speech
            .listen_once(request, Box::new(move |transcript| sink(transcript)))
        {
            if self.pending_listen == Some(token) {
                self.pending_listen = None;
            }
            return Err(e);
        }
        info!(token = token.0, "listening for answer");
        Ok(Refresh::default())
    }

    /// Complete a listen session. Results for any session other than the
    /// pending one are dropped.
    pub fn on_transcript(&mut self, transcript: Transcript) -> Refresh {
        if self.pending_listen != Some(transcript.token) {
            debug!(token = transcript.token.0, "discarding stale transcript");
            return Refresh::default();
        }
        self.pending_listen = None;

        match self
            .quiz
            .check_answer(&self.session, &transcript.text, AnswerSource::Spoken)
        {
            Ok(check) => {
                self.result = Some(result_message(&check));
                Refresh {
                    answer: Some(check.submitted),
                }
            }
            Err(e) => {
                self.notice = Some(Message::new(Tone::Failure, e.to_string()));
                Refresh::default()
            }
        }
    }

    /// Render projection of the current state
    pub fn view(&self) -> View {
        let current = &self.session.current_list_name;
        let lists = self
            .lists
            .ordered_lists()
            .into_iter()
            .map(|l| ListEntry {
                label: l.display_label().to_string(),
                selected: l.name == *current,
                is_builtin: l.is_builtin,
                name: l.name,
            })
            .collect();
        let words = self.lists.words(current).unwrap_or_default();
        let is_builtin = self.lists.is_builtin(current);

        View {
            list_mode: self.config.list_mode,
            lists,
            current_list: current.clone(),
            current_label: self.lists.label(current),
            editor_text: words.join("\n"),
            word_count: words.len(),
            can_reset: is_builtin,
            can_delete: !is_builtin,
            play_label: if self.played {
                SKIP_WORD_LABEL
            } else {
                PLAY_WORD_LABEL
            },
            buttons: self.session.button_enablement(),
            revealed_word: self
                .session
                .current_word
                .clone()
                .filter(|_| self.session.is_word_revealed),
            reveal_label: if self.session.is_word_revealed {
                HIDE_WORD_LABEL
            } else {
                SHOW_WORD_LABEL
            },
            result: self.result.clone(),
            notice: self.notice.clone(),
            listening: self.pending_listen.is_some(),
        }
    }
}
