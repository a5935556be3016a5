//! Application state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nebula_sage::{GameStatus, Hint, SessionController, SessionEvent};
use tracing::debug;

/// Longest input the guess field accepts ("100").
const MAX_GUESS_DIGITS: usize = 3;

/// Short audible-style cue shown in the footer after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Cue {
    /// A guess was sent.
    Scan,
    /// The guess was too high.
    HighHint,
    /// The guess was too low.
    LowHint,
    /// The target was found.
    Victory,
    /// All attempts used.
    GameOver,
    /// A new session began.
    Reset,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Leave the application.
    Quit,
    /// Validate this API key.
    SubmitKey(String),
    /// Send this guess to the controller.
    SubmitGuess(String),
    /// Start a new session.
    Reset,
}

/// Active screen.
#[derive(Debug)]
pub enum Screen {
    /// Waiting for a usable API key.
    Onboarding {
        /// A key is being checked.
        validating: bool,
    },
    /// Playing.
    Game(SessionController),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    screen: Screen,
    input: String,
    notice: Option<String>,
    cue: Option<Cue>,
    provider_label: String,
}

impl App {
    /// Starts on the onboarding screen.
    pub fn onboarding(provider_label: String, notice: Option<String>) -> Self {
        Self {
            screen: Screen::Onboarding { validating: false },
            input: String::new(),
            notice,
            cue: None,
            provider_label,
        }
    }

    /// Starts directly in a game.
    pub fn game(provider_label: String, controller: SessionController) -> Self {
        Self {
            screen: Screen::Game(controller),
            input: String::new(),
            notice: None,
            cue: Some(Cue::Reset),
            provider_label,
        }
    }

    /// Gets the active screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the text typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Gets the notice line, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Gets the last cue.
    pub fn cue(&self) -> Option<Cue> {
        self.cue
    }

    /// Gets the name of the Oracle's provider.
    pub fn provider_label(&self) -> &str {
        &self.provider_label
    }

    /// Gets the controller once playing.
    pub fn controller(&self) -> Option<&SessionController> {
        match &self.screen {
            Screen::Game(controller) => Some(controller),
            Screen::Onboarding { .. } => None,
        }
    }

    /// Marks the onboarding key as being checked.
    pub fn begin_validation(&mut self) {
        if let Screen::Onboarding { validating } = &mut self.screen {
            *validating = true;
        }
        self.notice = None;
    }

    /// Shows a rejected key and lets the player try again.
    pub fn reject_key(&mut self, message: String) {
        self.screen = Screen::Onboarding { validating: false };
        self.input.clear();
        self.notice = Some(message);
    }

    /// Switches to the game screen.
    pub fn enter_game(&mut self, controller: SessionController) {
        self.screen = Screen::Game(controller);
        self.input.clear();
        self.notice = None;
        self.cue = Some(Cue::Reset);
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return Action::Quit;
        }

        let game = self
            .controller()
            .map(|controller| controller.view())
            .map(|view| (view.status, view.pending));
        let validating = matches!(self.screen, Screen::Onboarding { validating: true });
        match (game, validating) {
            (None, true) => Action::None,
            (None, false) => self.handle_onboarding_key(key, ctrl),
            (Some(_), _) if ctrl && key.code == KeyCode::Char('r') => {
                self.input.clear();
                Action::Reset
            }
            (Some((status, _)), _) if status.is_over() => Self::handle_game_over_key(key),
            (Some((_, pending)), _) => self.handle_guess_key(key, ctrl, pending),
        }
    }

    fn handle_onboarding_key(&mut self, key: KeyEvent, ctrl: bool) -> Action {
        match key.code {
            KeyCode::Enter => Action::SubmitKey(std::mem::take(&mut self.input)),
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            KeyCode::Char(c) if !ctrl && !c.is_control() => {
                self.input.push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Edits the guess field. Enter is held back while the Oracle is still
    /// answering, so the typed guess survives.
    fn handle_guess_key(&mut self, key: KeyEvent, ctrl: bool, pending: bool) -> Action {
        match key.code {
            KeyCode::Enter if !pending && !self.input.is_empty() => {
                Action::SubmitGuess(std::mem::take(&mut self.input))
            }
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            KeyCode::Char(c)
                if !ctrl && c.is_ascii_digit() && self.input.len() < MAX_GUESS_DIGITS =>
            {
                self.input.push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_game_over_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }

    /// Handles a controller event.
    pub fn handle_event(&mut self, event: SessionEvent) {
        debug!(?event, "Handling session event");

        self.cue = match event {
            SessionEvent::GuessRecorded { .. } => Some(Cue::Scan),
            SessionEvent::FeedbackReady { hint, .. } => match hint {
                Hint::TooHigh => Some(Cue::HighHint),
                Hint::TooLow => Some(Cue::LowHint),
                Hint::Correct => self.cue,
            },
            SessionEvent::StatusChanged { status, .. } => match status {
                GameStatus::Won => Some(Cue::Victory),
                GameStatus::Lost => Some(Cue::GameOver),
                GameStatus::Playing => self.cue,
            },
            SessionEvent::SessionReset { .. } => Some(Cue::Reset),
            SessionEvent::StaleFeedbackDropped { .. } => self.cue,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::KeyEventKind;
    use nebula_sage::{
        FeedbackProvider, FeedbackRequest, OfflineOracle, ProviderError, SeededSampler,
        SilentNarrator,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn ctrl_key(c: char) -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char(c), KeyModifiers::CONTROL, KeyEventKind::Press)
    }

    /// Never answers.
    struct SilentOracle;

    #[async_trait]
    impl FeedbackProvider for SilentOracle {
        async fn generate_feedback(
            &self,
            _request: FeedbackRequest,
        ) -> Result<String, ProviderError> {
            std::future::pending().await
        }
    }

    fn game_app() -> App {
        let controller = SessionController::new(
            Arc::new(OfflineOracle),
            Arc::new(SilentNarrator),
            Arc::new(SeededSampler::new(3)),
        );
        App::game("offline".to_string(), controller)
    }

    #[test]
    fn guess_field_accepts_three_digits_only() {
        let mut app = game_app();
        for c in ['1', 'x', '0', '0', '7'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.input(), "100");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Action::SubmitGuess("100".to_string())
        );
        assert_eq!(app.input(), "");
    }

    #[test]
    fn empty_enter_does_nothing() {
        let mut app = game_app();
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn onboarding_collects_key() {
        let mut app = App::onboarding("gemini".to_string(), None);
        for c in "abc".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Action::SubmitKey("abc".to_string())
        );
    }

    #[test]
    fn onboarding_ignores_control_chords() {
        let mut app = App::onboarding("gemini".to_string(), None);
        app.handle_key(key(KeyCode::Char('k')));
        app.handle_key(ctrl_key('r'));
        app.handle_key(ctrl_key('v'));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.input(), "ky");
    }

    #[tokio::test]
    async fn enter_is_held_while_feedback_pending() {
        let controller = SessionController::new(
            Arc::new(SilentOracle),
            Arc::new(SilentNarrator),
            Arc::new(SeededSampler::new(3)),
        );
        let mut app = App::game("gemini".to_string(), controller.clone());

        tokio::spawn(async move { controller.submit_guess("50").await });
        tokio::time::timeout(Duration::from_secs(1), async {
            while !app.controller().is_some_and(|c| c.view().pending) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("guess never became pending");

        app.handle_key(key(KeyCode::Char('7')));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.input(), "7");
    }

    #[test]
    fn escape_quits_anywhere() {
        let mut app = App::onboarding("gemini".to_string(), None);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn events_map_to_cues() {
        let mut app = game_app();
        let session_id = nebula_sage::SessionId(1);
        app.handle_event(SessionEvent::FeedbackReady {
            session_id,
            hint: Hint::TooHigh,
            fallback: false,
        });
        assert_eq!(app.cue(), Some(Cue::HighHint));
        app.handle_event(SessionEvent::StatusChanged {
            session_id,
            status: GameStatus::Lost,
        });
        assert_eq!(app.cue(), Some(Cue::GameOver));
    }
}
