/// Which word-dependent controls can be used right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEnablement {
    pub replay: bool,
    pub toggle_reveal: bool,
}

impl ButtonEnablement {
    /// Replay and reveal are usable iff there is a non-blank current word
    pub fn for_word(current_word: Option<&str>) -> Self {
        let has_word = current_word.is_some_and(|w| !w.trim().is_empty());
        Self {
            replay: has_word,
            toggle_reveal: has_word,
        }
    }
}

/// Ephemeral per-session quiz state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_list_name: String,
    /// Snapshot taken at draw time; later edits to the list don't touch it
    pub current_word: Option<String>,
    pub is_word_revealed: bool,
}

impl SessionState {
    pub fn new(list_name: impl Into<String>) -> Self {
        Self {
            current_list_name: list_name.into(),
            current_word: None,
            is_word_revealed: false,
        }
    }

    /// Make another list active, dropping the current word
    pub fn switch_list(&mut self, list_name: impl Into<String>) {
        *self = Self::new(list_name);
    }

    /// Forget the current word but stay on the same list
    pub fn clear_word(&mut self) {
        self.current_word = None;
        self.is_word_revealed = false;
    }

    pub fn has_word(&self) -> bool {
        self.current_word.is_some()
    }

    pub fn button_enablement(&self) -> ButtonEnablement {
        ButtonEnablement::for_word(self.current_word.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_word() {
        let session = SessionState::new("grade1");
        assert_eq!(session.current_list_name, "grade1");
        assert!(!session.has_word());
        assert!(!session.is_word_revealed);
        assert_eq!(session.button_enablement(), ButtonEnablement::default());
    }

    #[test]
    fn enablement_requires_non_blank_word() {
        assert_eq!(ButtonEnablement::for_word(None), ButtonEnablement::default());
        assert_eq!(
            ButtonEnablement::for_word(Some("  ")),
            ButtonEnablement::default()
        );
        let enabled = ButtonEnablement::for_word(Some("cat"));
        assert!(enabled.replay && enabled.toggle_reveal);
    }

    #[test]
    fn switch_list_resets_everything() {
        let mut session = SessionState::new("a");
        session.current_word = Some("cat".into());
        session.is_word_revealed = true;

        session.switch_list("b");

        assert_eq!(session, SessionState::new("b"));
    }

    #[test]
    fn clear_word_keeps_list() {
        let mut session = SessionState::new("a");
        session.current_word = Some("cat".into());
        session.is_word_revealed = true;

        session.clear_word();

        assert_eq!(session.current_list_name, "a");
        assert_eq!(session.current_word, None);
        assert!(!session.is_word_revealed);
    }
}
