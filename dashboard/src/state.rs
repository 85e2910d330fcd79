//! Dashboard state: the central struct owning every component.
//!
//! A single `DashboardState` holds the tracker, session, router and the
//! activity log.  The frame loop calls `tick` once per captured frame;
//! rendering reads `snapshot` and never mutates anything.
//!
//! Tick order:
//! 1. frame timers (logout cooldown, exit confirmation)
//! 2. cursor tracking (only while logged in)
//! 3. logout completion on an empty frame
//! 4. login classification (only while waiting)
//! 5. router dispatch of the pinch edge
//! 6. widget forwarding; a pinch the router consumed is withheld from
//!    widgets (edge and drag) until it is released
//! 7. activity entries handed to the log

use serde::Serialize;
use tracing::{info, trace};

use crate::activity::ActivityLog;
use crate::config::DashboardConfig;
use crate::geometry::Point;
use crate::session::{LoginProgress, Session, SessionEvent, SessionPhase};
use crate::tracking::{classify, CursorSample, CursorTracker, LandmarkSet, LoginGesture, UserId};
use crate::ui::{
    ActiveView, Button, ExitButton, RoomDetailView, RoomId, RoomLayout, RoomPower, RoomZone,
    Router, RouterAction,
};

/// Result of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The user confirmed the exit button this tick.
    pub exit_requested: bool,
}

/// Read-only view of the dashboard for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub frame: u64,
    pub session: SessionPhase,
    pub user: Option<UserId>,
    pub logged_in: bool,
    pub login_enabled: bool,
    pub cooldown_frames: u32,
    pub logout_pending: bool,
    pub login_gesture: Option<LoginGesture>,
    pub login_progress: Option<LoginProgress>,
    pub view: ActiveView,
    pub menu_open: bool,
    pub selected_room: Option<RoomId>,
    pub hovered_room: Option<RoomId>,
    pub cursor: Option<Point>,
    pub touching: bool,
    pub pinch_active: bool,
    pub pinch_rising_edge: bool,
    pub menu_button: Button,
    pub logout_button: Button,
    pub exit_button: ExitButton,
    pub room_power: Vec<RoomPower>,
    /// Floor plan outlines in hit-test order.
    pub zones: Vec<RoomZone>,
    pub room_view: Option<RoomDetailView>,
}

/// Central dashboard state.
pub struct DashboardState {
    pub config: DashboardConfig,
    pub tracker: CursorTracker,
    pub session: Session,
    pub router: Router,
    activity: Box<dyn ActivityLog>,
    /// Entries raised during the current tick, written at its end.
    pending: Vec<(UserId, String)>,
    last_sample: CursorSample,
    last_gesture: Option<LoginGesture>,
    /// The current pinch was used by the router; widgets ignore it until release.
    pinch_consumed: bool,
    frame: u64,
}

impl DashboardState {
    pub fn new(config: DashboardConfig, layout: RoomLayout, activity: Box<dyn ActivityLog>) -> Self {
        let tracker = CursorTracker::new(config.tracker.clone());
        let session = Session::new(config.session.clone());
        let router = Router::new(config.router.clone(), layout);
        info!(
            "DashboardState initialized ({} room zones, {}x{})",
            router.layout().zones().len(),
            config.frame_width,
            config.frame_height,
        );
        Self {
            config,
            tracker,
            session,
            router,
            activity,
            pending: Vec::new(),
            last_sample: CursorSample::ABSENT,
            last_gesture: None,
            pinch_consumed: false,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Tracker output of the most recent tick.
    pub fn last_sample(&self) -> CursorSample {
        self.last_sample
    }

    /// Process one captured frame.  `None` means no hand was detected.
    pub fn tick(&mut self, hand: Option<&LandmarkSet>) -> TickOutcome {
        self.frame += 1;
        let mut outcome = TickOutcome::default();

        self.session.begin_tick();
        self.router.tick();

        let sample = if self.session.tracking_enabled() {
            self.tracker.update(hand)
        } else {
            self.tracker.reset();
            CursorSample::ABSENT
        };

        if let Some(event) = self.session.observe_presence(hand.is_some()) {
            self.router.on_logout();
            self.tracker.reset();
            self.push_session_event(event);
        }

        self.last_gesture = None;
        if self.session.login_enabled() {
            let gesture = hand.map(classify);
            self.last_gesture = gesture;
            if let Some(event) = self.session.observe_login(gesture) {
                self.router.on_login();
                self.push_session_event(event);
            }
        }

        if !sample.pinch_active {
            self.pinch_consumed = false;
        }
        if self.session.interaction_enabled() && sample.pinch_rising_edge {
            if let Some(action) = sample.cursor.and_then(|p| self.router.dispatch(p)) {
                self.pinch_consumed = true;
                self.apply_action(action, &mut outcome);
            }
        }

        if self.session.interaction_enabled() {
            let widget_pinch = sample.pinch_active && !self.pinch_consumed;
            let changes = self.router.update_widgets(
                sample.cursor,
                sample.pinch_rising_edge && widget_pinch,
                widget_pinch,
            );
            for change in changes {
                self.push_user_action(change.describe());
            }
            self.router.update_hover(sample.cursor);
        } else {
            self.router.update_hover(None);
        }

        self.last_sample = sample;
        self.flush_activity();
        trace!("Frame {}: {}", self.frame, self.status_sexp());
        outcome
    }

    fn apply_action(&mut self, action: RouterAction, outcome: &mut TickOutcome) {
        match action {
            RouterAction::LogoutRequested => {
                if let Some(event) = self.session.request_logout() {
                    self.push_session_event(event);
                }
            }
            RouterAction::ExitConfirmed => {
                info!("Exit confirmed by user");
                outcome.exit_requested = true;
                self.push_user_action(action.describe());
            }
            _ => self.push_user_action(action.describe()),
        }
    }

    fn push_session_event(&mut self, event: SessionEvent) {
        self.pending.push((event.user(), event.action().to_string()));
    }

    /// Queue an action on behalf of the logged-in user.
    fn push_user_action(&mut self, action: String) {
        if let Some(user) = self.session.user_id() {
            self.pending.push((user, action));
        }
    }

    fn flush_activity(&mut self) {
        for (user, action) in self.pending.drain(..) {
            self.activity.log(&user.label(), &action);
        }
    }

    /// Write buffered activity entries out.  Called by the frame loop
    /// between frames, never from `tick`.
    pub fn flush_activity_log(&mut self) {
        self.activity.flush();
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            frame: self.frame,
            session: self.session.phase(),
            user: self.session.user_id(),
            logged_in: self.session.logged_in(),
            login_enabled: self.session.login_enabled(),
            cooldown_frames: self.session.cooldown_frames(),
            logout_pending: self.session.logout_pending(),
            login_gesture: self.last_gesture,
            login_progress: self.session.login_progress(),
            view: self.router.view(),
            menu_open: self.router.menu_open(),
            selected_room: self.router.selected_room(),
            hovered_room: self.router.hovered_room(),
            cursor: self.last_sample.cursor,
            touching: self.last_sample.touching,
            pinch_active: self.last_sample.pinch_active,
            pinch_rising_edge: self.last_sample.pinch_rising_edge,
            menu_button: self.router.menu_button.clone(),
            logout_button: self.router.logout_button.clone(),
            exit_button: self.router.exit_button.clone(),
            room_power: self.router.room_power().to_vec(),
            zones: self.router.layout().zones().to_vec(),
            room_view: self.router.active_room_view().cloned(),
        }
    }

    /// Generate s-expression for status logging.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:frame {} :session {} :tracker {} :router {})",
            self.frame,
            self.session.status_sexp(),
            self.tracker.status_sexp(),
            self.router.status_sexp(),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
