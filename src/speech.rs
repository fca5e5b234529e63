use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, warn};

use crate::error::{Result, SpellError};

pub const DEFAULT_LOCALE: &str = "en-US";

/// espeak's natural speaking rate, words per minute
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SpeechRate {
    Normal,
    Slow,
}

/// A single request to say something
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Multiple of the natural speaking rate
    pub rate: f32,
    pub locale: String,
}

/// Identifies one listen session; results from older sessions are stale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenToken(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenRequest {
    pub token: ListenToken,
    pub locale: String,
}

/// Best-guess transcript for one listen session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub token: ListenToken,
    pub text: String,
}

/// Invoked exactly once per listen session
pub type TranscriptCallback = Box<dyn FnOnce(Transcript) + Send + 'static>;

/// Speech synthesis and recognition provided by the host
pub trait SpeechService {
    /// Fire-and-forget: returns as soon as speaking has started
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Start listening; `on_result` fires once with the best transcript
    fn listen_once(&mut self, request: ListenRequest, on_result: TranscriptCallback)
        -> Result<()>;

    /// Stop the running listen session, if any. Its transcript may still arrive.
    fn cancel_listen(&mut self) {}
}

/// Speech through external programs (e.g. `espeak-ng` for synthesis and any
/// recognizer that prints a transcript on stdout).
#[derive(Clone, Debug, Default)]
pub struct CommandSpeech {
    speak_command: Option<String>,
    listen_command: Option<String>,
    /// recognizer of the latest listen session
    listening: Option<Arc<Mutex<Child>>>,
}

impl CommandSpeech {
    pub fn new(speak_command: Option<String>, listen_command: Option<String>) -> Self {
        Self {
            speak_command: speak_command.filter(|c| !c.trim().is_empty()),
            listen_command: listen_command.filter(|c| !c.trim().is_empty()),
            listening: None,
        }
    }

    fn words_per_minute(rate: f32) -> u32 {
        (BASE_WORDS_PER_MINUTE * rate).round().max(1.0) as u32
    }

    /// Split a configured command line into program and leading arguments
    fn program_and_args(command: &str) -> (String, Vec<String>) {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        (program, parts.collect())
    }
}

fn unavailable(capability: &str) -> SpellError {
    SpellError::CapabilityUnavailable(capability.to_string())
}

impl SpeechService for CommandSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        let command = self
            .speak_command
            .as_deref()
            .ok_or_else(|| unavailable("speech synthesis"))?;
        let (program, args) = Self::program_and_args(command);
        let voice = utterance.locale.to_lowercase();

        let spawned = Command::new(&program)
            .args(&args)
            .arg("-v")
            .arg(&voice)
            .arg("-s")
            .arg(Self::words_per_minute(utterance.rate).to_string())
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                debug!(program = %program, rate = utterance.rate, "speaking");
                // reap in the background so speaking never blocks the UI
                thread::spawn(move || {
                    let _ = child.wait();
                });
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(unavailable("speech synthesis")),
            Err(e) => Err(e.into()),
        }
    }

    fn listen_once(
        &mut self,
        request: ListenRequest,
        on_result: TranscriptCallback,
    ) -> Result<()> {
        let command = self
            .listen_command
            .as_deref()
            .ok_or_else(|| unavailable("speech recognition"))?;
        let (program, args) = Self::program_and_args(command);
        self.cancel_listen();

        let spawned = Command::new(&program)
            .args(&args)
            .env("SPELLBEE_LOCALE", &request.locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(unavailable("speech recognition"))
            }
            Err(e) => return Err(e.into()),
        };
        debug!(token = request.token.0, program = %program, "listening");
        let stdout = child.stdout.take();
        let child = Arc::new(Mutex::new(child));
        self.listening = Some(Arc::clone(&child));

        thread::spawn(move || {
            let mut line = String::new();
            if let Some(stdout) = stdout {
                if let Err(e) = BufReader::new(stdout).read_line(&mut line) {
                    warn!(error = %e, "failed to read transcript");
                }
            }
            if let Ok(mut child) = child.lock() {
                let _ = child.wait();
            }
            on_result(Transcript {
                token: request.token,
                text: line.trim().to_string(),
            });
        });
        Ok(())
    }

    fn cancel_listen(&mut self) {
        let Some(child) = self.listening.take() else {
            return;
        };
        // a locked child is already being reaped
        if let Ok(mut child) = child.try_lock() {
            if child.kill().is_ok() {
                debug!(pid = child.id(), "stopped recognizer");
            }
        };
    }
}

/// Records what was said and answers listen requests from a script.
///
/// Listening completes synchronously, which keeps headless tests simple.
#[derive(Debug, Default)]
pub struct ScriptedSpeech {
    pub spoken: Vec<Utterance>,
    transcripts: VecDeque<String>,
    pub listen_available: bool,
    pub listens: Vec<ListenRequest>,
}

impl ScriptedSpeech {
    pub fn new() -> Self {
        Self {
            listen_available: true,
            ..Self::default()
        }
    }

    pub fn with_transcripts<I, T>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            transcripts: transcripts.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    pub fn without_recognition() -> Self {
        Self {
            listen_available: false,
            ..Self::default()
        }
    }
}

impl SpeechService for ScriptedSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.spoken.push(utterance.clone());
        Ok(())
    }

    fn listen_once(
        &mut self,
        request: ListenRequest,
        on_result: TranscriptCallback,
    ) -> Result<()> {
        if !self.listen_available {
            return Err(unavailable("speech recognition"));
        }
        let text = self.transcripts.pop_front().unwrap_or_default();
        let token = request.token;
        self.listens.push(request);
        on_result(Transcript { token, text });
        Ok(())
    }
}
