use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Intent, Refresh, View};
use crate::runtime::AppEvent;

/// Which control currently receives typed characters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Answer,
    Editor,
    NewListName,
    ConfirmDelete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    Intent(Intent),
    Quit,
    None,
}

/// Input-side state of the terminal surface: text buffers and focus.
/// Turns key presses into intents for the [`App`].
#[derive(Clone, Debug, Default)]
pub struct Controls {
    pub focus: Focus,
    pub answer: String,
    pub editor: String,
    pub new_list_name: String,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_refresh(&mut self, refresh: &Refresh) {
        if let Some(answer) = &refresh.answer {
            self.answer.clone_from(answer);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, view: &View) -> ControlAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ControlAction::Quit;
        }

        match self.focus {
            Focus::Answer => self.on_answer_key(key, view),
            Focus::Editor => self.on_editor_key(key),
            Focus::NewListName => self.on_new_list_key(key),
            Focus::ConfirmDelete => {
                self.focus = Focus::Answer;
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        ControlAction::Intent(Intent::DeleteList)
                    }
                    _ => ControlAction::None,
                }
            }
        }
    }

    fn on_answer_key(&mut self, key: KeyEvent, view: &View) -> ControlAction {
        let intent = match key.code {
            KeyCode::Esc => return ControlAction::Quit,
            KeyCode::Enter => Intent::CheckAnswer(self.answer.clone()),
            KeyCode::F(1) => Intent::PlayWord,
            KeyCode::F(2) => Intent::ReplayWord,
            KeyCode::F(3) => Intent::ToggleReveal,
            KeyCode::F(4) => Intent::SpeakAnswer,
            KeyCode::F(5) => {
                self.editor.clone_from(&view.editor_text);
                self.focus = Focus::Editor;
                return ControlAction::None;
            }
            KeyCode::F(6) => Intent::ResetList,
            KeyCode::F(7) => {
                self.new_list_name.clear();
                self.focus = Focus::NewListName;
                return ControlAction::None;
            }
            // built-in lists report why they can't go without asking first
            KeyCode::F(8) if view.can_delete => {
                self.focus = Focus::ConfirmDelete;
                return ControlAction::None;
            }
            KeyCode::F(8) => Intent::DeleteList,
            KeyCode::Tab | KeyCode::PageDown => Intent::NextList,
            KeyCode::BackTab | KeyCode::PageUp => Intent::PreviousList,
            KeyCode::Backspace => {
                self.answer.pop();
                return ControlAction::None;
            }
            KeyCode::Char(c) => {
                self.answer.push(c);
                return ControlAction::None;
            }
            _ => return ControlAction::None,
        };
        ControlAction::Intent(intent)
    }

    fn on_editor_key(&mut self, key: KeyEvent) -> ControlAction {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus = Focus::Answer;
                ControlAction::Intent(Intent::SaveWords(std::mem::take(&mut self.editor)))
            }
            KeyCode::Esc => {
                self.editor.clear();
                self.focus = Focus::Answer;
                ControlAction::None
            }
            KeyCode::Enter => {
                self.editor.push('\n');
                ControlAction::None
            }
            KeyCode::Backspace => {
                self.editor.pop();
                ControlAction::None
            }
            KeyCode::Char(c) => {
                self.editor.push(c);
                ControlAction::None
            }
            _ => ControlAction::None,
        }
    }

    fn on_new_list_key(&mut self, key: KeyEvent) -> ControlAction {
        match key.code {
            KeyCode::Enter => {
                self.focus = Focus::Answer;
                let name = std::mem::take(&mut self.new_list_name);
                if name.trim().is_empty() {
                    ControlAction::None
                } else {
                    ControlAction::Intent(Intent::CreateList(name))
                }
            }
            KeyCode::Esc => {
                self.new_list_name.clear();
                self.focus = Focus::Answer;
                ControlAction::None
            }
            KeyCode::Backspace => {
                self.new_list_name.pop();
                ControlAction::None
            }
            KeyCode::Char(c) => {
                self.new_list_name.push(c);
                ControlAction::None
            }
            _ => ControlAction::None,
        }
    }
}

/// Feed one event through controls and app. Returns false once the user quits.
pub fn dispatch(app: &mut App, controls: &mut Controls, event: AppEvent) -> bool {
    match event {
        AppEvent::Tick | AppEvent::Resize => true,
        AppEvent::Transcript(transcript) => {
            let refresh = app.on_transcript(transcript);
            controls.apply_refresh(&refresh);
            true
        }
        AppEvent::Key(key) if key.kind != KeyEventKind::Press => true,
        AppEvent::Key(key) => {
            let view = app.view();
            match controls.on_key(key, &view) {
                ControlAction::Quit => false,
                ControlAction::Intent(intent) => {
                    let refresh = app.handle(intent);
                    controls.apply_refresh(&refresh);
                    true
                }
                ControlAction::None => true,
            }
        }
    }
}
