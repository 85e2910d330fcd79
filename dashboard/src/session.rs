//! Login/logout state machine.
//!
//! Gates whether hand input drives the login screen (classifier) or the
//! dashboard (cursor + router).  Logout is a two-phase protocol: the
//! logout button only *requests* it, and the session ends once the hand
//! has left the frame, followed by a frame-counted cooldown before a new
//! login is accepted.
//!
//! ```text
//!   LoggedOutWaiting --(gesture confirmed)--> LoggedIn
//!   LoggedIn --(logout button)--> LogoutPending
//!   LogoutPending --(no hand)--> LoggedOutCooldown --(counter hits 0)--> LoggedOutWaiting
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::tracking::{LoginGesture, UserId};

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Consecutive frames the same login gesture must be held.
    pub login_confirm_frames: u32,
    /// Frames to ignore input after a logout (about 0.5 s at 60 fps).
    pub logout_cooldown_frames: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_confirm_frames: 8,
            logout_cooldown_frames: 30,
        }
    }
}

// ── Phase ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum SessionPhase {
    LoggedOutWaiting,
    LoggedOutCooldown { remaining: u32 },
    LoggedIn { user: UserId },
    LogoutPending { user: UserId },
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoggedOutWaiting => "logged-out-waiting",
            Self::LoggedOutCooldown { .. } => "logged-out-cooldown",
            Self::LoggedIn { .. } => "logged-in",
            Self::LogoutPending { .. } => "logout-pending",
        }
    }
}

// ── Events ─────────────────────────────────────────────────

/// Session transitions worth recording in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user: UserId, gesture: LoginGesture },
    LogoutRequested { user: UserId },
    LogoutCompleted { user: UserId },
}

impl SessionEvent {
    pub fn user(&self) -> UserId {
        match self {
            Self::LoggedIn { user, .. }
            | Self::LogoutRequested { user }
            | Self::LogoutCompleted { user } => *user,
        }
    }

    /// Activity log action text.
    pub fn action(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => "login successful",
            Self::LogoutRequested { .. } => "logout requested (pending)",
            Self::LogoutCompleted { .. } => "logout completed",
        }
    }
}

/// Login confirmation progress, shown on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoginProgress {
    pub gesture: LoginGesture,
    pub count: u32,
    pub threshold: u32,
}

// ── Session ────────────────────────────────────────────────

pub struct Session {
    pub config: SessionConfig,
    phase: SessionPhase,
    /// Gesture currently being confirmed and how many frames it has held.
    candidate: Option<(LoginGesture, u32)>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        info!(
            "Session initialized: login confirm {} frames, logout cooldown {} frames",
            config.login_confirm_frames, config.logout_cooldown_frames,
        );
        Self {
            config,
            phase: SessionPhase::LoggedOutWaiting,
            candidate: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while a user is logged in, including a pending logout.
    pub fn logged_in(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::LoggedIn { .. } | SessionPhase::LogoutPending { .. }
        )
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self.phase {
            SessionPhase::LoggedIn { user } | SessionPhase::LogoutPending { user } => Some(user),
            _ => None,
        }
    }

    /// Classifier-based login is only active while waiting.
    pub fn login_enabled(&self) -> bool {
        matches!(self.phase, SessionPhase::LoggedOutWaiting)
    }

    pub fn cooldown_frames(&self) -> u32 {
        match self.phase {
            SessionPhase::LoggedOutCooldown { remaining } => remaining,
            _ => 0,
        }
    }

    pub fn logout_pending(&self) -> bool {
        matches!(self.phase, SessionPhase::LogoutPending { .. })
    }

    /// Router dispatch is only allowed in a settled login.
    pub fn interaction_enabled(&self) -> bool {
        matches!(self.phase, SessionPhase::LoggedIn { .. })
    }

    /// Whether the cursor tracker should run this frame.
    pub fn tracking_enabled(&self) -> bool {
        self.logged_in()
    }

    pub fn login_progress(&self) -> Option<LoginProgress> {
        self.candidate.map(|(gesture, count)| LoginProgress {
            gesture,
            count,
            threshold: self.config.login_confirm_frames,
        })
    }

    /// Advance frame-counted timers.  Called once at the start of each tick.
    pub fn begin_tick(&mut self) {
        if let SessionPhase::LoggedOutCooldown { remaining } = self.phase {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                debug!("Logout cooldown elapsed, waiting for login");
                self.phase = SessionPhase::LoggedOutWaiting;
            } else {
                self.phase = SessionPhase::LoggedOutCooldown { remaining };
            }
        }
    }

    /// Complete a pending logout once the hand has left the frame.
    pub fn observe_presence(&mut self, hand_present: bool) -> Option<SessionEvent> {
        let SessionPhase::LogoutPending { user } = self.phase else {
            return None;
        };
        if hand_present {
            return None;
        }

        self.phase = if self.config.logout_cooldown_frames == 0 {
            SessionPhase::LoggedOutWaiting
        } else {
            SessionPhase::LoggedOutCooldown {
                remaining: self.config.logout_cooldown_frames,
            }
        };
        self.candidate = None;
        info!("{} logged out", user.label());
        Some(SessionEvent::LogoutCompleted { user })
    }

    /// Feed the classifier result for this frame (`None` = no hand).
    pub fn observe_login(&mut self, gesture: Option<LoginGesture>) -> Option<SessionEvent> {
        if !self.login_enabled() {
            self.candidate = None;
            return None;
        }

        let Some(gesture) = gesture.filter(|g| g.user().is_some()) else {
            self.candidate = None;
            return None;
        };

        let count = match self.candidate {
            Some((prev, n)) if prev == gesture => n.saturating_add(1),
            _ => 1,
        };
        self.candidate = Some((gesture, count));

        if count < self.config.login_confirm_frames {
            return None;
        }

        let user = gesture.user()?;
        self.phase = SessionPhase::LoggedIn { user };
        self.candidate = None;
        info!("{} logged in ({})", user.label(), gesture.as_str());
        Some(SessionEvent::LoggedIn { user, gesture })
    }

    /// Logout button pressed.  Only valid in a settled login.
    pub fn request_logout(&mut self) -> Option<SessionEvent> {
        let SessionPhase::LoggedIn { user } = self.phase else {
            return None;
        };
        self.phase = SessionPhase::LogoutPending { user };
        info!("{} requested logout, waiting for hand to leave", user.label());
        Some(SessionEvent::LogoutRequested { user })
    }

    /// Generate s-expression for status logging.
    pub fn status_sexp(&self) -> String {
        let user = self
            .user_id()
            .map(|u| u.0.to_string())
            .unwrap_or_else(|| "nil".to_string());
        let candidate = self
            .candidate
            .map(|(g, n)| format!("(:{} {})", g.as_str(), n))
            .unwrap_or_else(|| "nil".to_string());
        format!(
            "(:phase :{} :user {} :cooldown {} :login-candidate {})",
            self.phase.as_str(),
            user,
            self.cooldown_frames(),
            candidate,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn session(confirm: u32, cooldown: u32) -> Session {
        Session::new(SessionConfig {
            login_confirm_frames: confirm,
            logout_cooldown_frames: cooldown,
        })
    }

    fn logged_in(user_gesture: LoginGesture) -> Session {
        let mut s = session(1, 30);
        s.begin_tick();
        s.observe_login(Some(user_gesture));
        s
    }

    #[test]
    fn test_initial_state() {
        let s = Session::new(SessionConfig::default());
        assert_eq!(s.phase(), SessionPhase::LoggedOutWaiting);
        assert!(!s.logged_in());
        assert!(s.login_enabled());
        assert!(s.user_id().is_none());
        assert!(!s.interaction_enabled());
    }

    #[test]
    fn test_immediate_login_fist_is_user_one() {
        let mut s = session(1, 30);
        let ev = s.observe_login(Some(LoginGesture::Fist));
        assert!(matches!(
            ev,
            Some(SessionEvent::LoggedIn {
                user: UserId::ONE,
                ..
            })
        ));
        assert_eq!(s.user_id(), Some(UserId::ONE));
        assert!(s.interaction_enabled());
        assert!(!s.login_enabled());
    }

    #[test]
    fn test_open_hand_is_user_two() {
        let s = logged_in(LoginGesture::OpenHand);
        assert_eq!(s.user_id(), Some(UserId::TWO));
    }

    #[test]
    fn test_login_requires_confirmation_frames() {
        let mut s = session(3, 30);
        assert!(s.observe_login(Some(LoginGesture::Fist)).is_none());
        assert!(s.observe_login(Some(LoginGesture::Fist)).is_none());
        assert_eq!(
            s.login_progress(),
            Some(LoginProgress {
                gesture: LoginGesture::Fist,
                count: 2,
                threshold: 3
            })
        );
        assert!(s.observe_login(Some(LoginGesture::Fist)).is_some());
        assert!(s.login_progress().is_none());
    }

    #[test]
    fn test_changed_gesture_restarts_count() {
        let mut s = session(3, 30);
        s.observe_login(Some(LoginGesture::Fist));
        s.observe_login(Some(LoginGesture::Fist));
        s.observe_login(Some(LoginGesture::OpenHand));
        assert_eq!(s.login_progress().map(|p| p.count), Some(1));
        s.observe_login(Some(LoginGesture::OpenHand));
        let ev = s.observe_login(Some(LoginGesture::OpenHand));
        assert_eq!(ev.map(|e| e.user()), Some(UserId::TWO));
    }

    #[test]
    fn test_ambiguous_or_absent_resets_candidate() {
        let mut s = session(3, 30);
        s.observe_login(Some(LoginGesture::Fist));
        s.observe_login(Some(LoginGesture::Fist));
        s.observe_login(Some(LoginGesture::None));
        assert!(s.login_progress().is_none());
        s.observe_login(Some(LoginGesture::Fist));
        s.observe_login(None);
        assert!(s.login_progress().is_none());
        assert!(!s.logged_in());
    }

    #[test]
    fn test_logout_waits_for_empty_frame() {
        let mut s = logged_in(LoginGesture::Fist);
        let ev = s.request_logout();
        assert_eq!(ev, Some(SessionEvent::LogoutRequested { user: UserId::ONE }));
        assert!(s.logout_pending());
        assert!(!s.interaction_enabled());
        assert!(s.logged_in());

        for _ in 0..5 {
            s.begin_tick();
            assert!(s.observe_presence(true).is_none());
            assert!(s.logout_pending());
        }

        s.begin_tick();
        let ev = s.observe_presence(false);
        assert_eq!(ev, Some(SessionEvent::LogoutCompleted { user: UserId::ONE }));
        assert_eq!(s.phase(), SessionPhase::LoggedOutCooldown { remaining: 30 });
        assert!(s.user_id().is_none());
    }

    #[test]
    fn test_cooldown_counts_down_then_waits() {
        let mut s = logged_in(LoginGesture::Fist);
        s.request_logout();
        s.observe_presence(false);

        for expected in (1..30).rev() {
            s.begin_tick();
            assert_eq!(s.cooldown_frames(), expected);
            // Gestures are ignored during cooldown
            assert!(s.observe_login(Some(LoginGesture::Fist)).is_none());
        }
        s.begin_tick();
        assert_eq!(s.phase(), SessionPhase::LoggedOutWaiting);
        assert!(s.observe_login(Some(LoginGesture::OpenHand)).is_some());
    }

    #[test]
    fn test_zero_cooldown_goes_straight_to_waiting() {
        let mut s = session(1, 0);
        s.observe_login(Some(LoginGesture::Fist));
        s.request_logout();
        s.observe_presence(false);
        assert_eq!(s.phase(), SessionPhase::LoggedOutWaiting);
    }

    #[test]
    fn test_logout_only_from_logged_in() {
        let mut s = session(1, 30);
        assert!(s.request_logout().is_none());
        s.observe_login(Some(LoginGesture::Fist));
        s.request_logout();
        // Second request while pending is ignored
        assert!(s.request_logout().is_none());
    }

    #[test]
    fn test_presence_ignored_outside_pending() {
        let mut s = logged_in(LoginGesture::Fist);
        assert!(s.observe_presence(false).is_none());
        assert!(s.interaction_enabled());
    }

    #[test]
    fn test_event_actions() {
        let ev = SessionEvent::LogoutCompleted { user: UserId::TWO };
        assert_eq!(ev.action(), "logout completed");
        assert_eq!(ev.user().label(), "User 2");
    }

    #[test]
    fn test_status_sexp() {
        let mut s = session(3, 30);
        s.observe_login(Some(LoginGesture::OpenHand));
        let sexp = s.status_sexp();
        assert!(sexp.contains(":phase :logged-out-waiting"));
        assert!(sexp.contains(":login-candidate (:open-hand 1)"));
        let s = logged_in(LoginGesture::Fist);
        assert!(s.status_sexp().contains(":user 1"));
    }
}
