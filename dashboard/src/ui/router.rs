//! View state and hit-test dispatch.
//!
//! Each pinch edge is routed to exactly one target, by priority:
//!
//! 1. menu open (modal): menu, logout and exit buttons; anything else closes it
//! 2. room view: back button, then menu button
//! 3. home: menu button, then room zones in declaration order
//!
//! Room views additionally forward cursor and pinch state to their widgets
//! every frame, but only when the edge was not consumed here.

use serde::Serialize;
use tracing::debug;

use super::buttons::{Button, ButtonKind, ExitButton, ExitPress};
use super::room_view::RoomDetailView;
use super::widget::{WidgetChange, WidgetKind};
use super::zones::{RoomId, RoomLayout};
use crate::geometry::Point;

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Frames an armed exit button waits for confirmation (5 s at 60 fps).
    pub exit_confirm_frames: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            exit_confirm_frames: 300,
        }
    }
}

// ── View / actions ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "room", rename_all = "kebab-case")]
pub enum ActiveView {
    Home,
    Room(RoomId),
}

impl ActiveView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Room(room) => room.as_str(),
        }
    }
}

/// Outcome of a consumed pinch edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterAction {
    MenuOpened,
    MenuClosed,
    LogoutRequested,
    ExitArmed,
    ExitConfirmed,
    BackToHome { from: RoomId },
    Navigated { room: RoomId },
    RoomPower { room: RoomId, on: bool },
}

impl RouterAction {
    /// Activity log action text.
    pub fn describe(&self) -> String {
        match self {
            Self::MenuOpened => "menu opened".to_string(),
            Self::MenuClosed => "menu closed".to_string(),
            Self::LogoutRequested => "logout requested (pending)".to_string(),
            Self::ExitArmed => "exit pressed (confirm again)".to_string(),
            Self::ExitConfirmed => "program exited".to_string(),
            Self::BackToHome { .. } => "back to home view".to_string(),
            Self::Navigated { room } => format!("switched to {}", room.display_name()),
            Self::RoomPower { room, on } => format!(
                "{} switched {}",
                room.display_name(),
                if *on { "on" } else { "off" },
            ),
        }
    }
}

/// A widget state change inside the active room view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetActivity {
    pub room: RoomId,
    pub kind: WidgetKind,
    pub label: String,
    pub change: WidgetChange,
}

impl WidgetActivity {
    pub fn describe(&self) -> String {
        format!(
            "{} {} {}",
            self.room.display_name(),
            self.label.to_lowercase(),
            self.change.describe(),
        )
    }
}

/// Boolean device state of a room reachable from the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomPower {
    pub room: RoomId,
    pub on: bool,
}

// ── Router ─────────────────────────────────────────────────

pub struct Router {
    pub config: RouterConfig,
    view: ActiveView,
    menu_open: bool,
    selected_room: Option<RoomId>,
    hovered_room: Option<RoomId>,
    layout: RoomLayout,
    pub menu_button: Button,
    pub logout_button: Button,
    pub exit_button: ExitButton,
    views: Vec<RoomDetailView>,
    power: Vec<RoomPower>,
}

impl Router {
    pub fn new(config: RouterConfig, layout: RoomLayout) -> Self {
        let views = RoomId::ALL
            .iter()
            .filter(|r| r.has_detail_view())
            .map(|r| RoomDetailView::standard(*r))
            .collect();
        let power = RoomId::ALL
            .iter()
            .map(|r| RoomPower { room: *r, on: false })
            .collect();
        let exit_button = ExitButton::new(config.exit_confirm_frames);
        Self {
            config,
            view: ActiveView::Home,
            menu_open: false,
            selected_room: None,
            hovered_room: None,
            layout,
            menu_button: Button::new(ButtonKind::Menu),
            logout_button: Button::new(ButtonKind::Logout),
            exit_button,
            views,
            power,
        }
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn selected_room(&self) -> Option<RoomId> {
        self.selected_room
    }

    pub fn hovered_room(&self) -> Option<RoomId> {
        self.hovered_room
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    pub fn room_power(&self) -> &[RoomPower] {
        &self.power
    }

    pub fn is_powered(&self, room: RoomId) -> bool {
        self.power.iter().any(|p| p.room == room && p.on)
    }

    pub fn room_view(&self, room: RoomId) -> Option<&RoomDetailView> {
        self.views.iter().find(|v| v.room == room)
    }

    pub fn room_view_mut(&mut self, room: RoomId) -> Option<&mut RoomDetailView> {
        self.views.iter_mut().find(|v| v.room == room)
    }

    /// Detail view currently on screen, if any.
    pub fn active_room_view(&self) -> Option<&RoomDetailView> {
        match self.view {
            ActiveView::Home => None,
            ActiveView::Room(room) => self.room_view(room),
        }
    }

    /// Route a pinch edge at `p` to a single target.
    pub fn dispatch(&mut self, p: Point) -> Option<RouterAction> {
        if self.menu_open {
            return Some(self.dispatch_menu(p));
        }

        match self.view {
            ActiveView::Room(room) => {
                if self.room_view(room).is_some_and(|v| v.back.hit(p)) {
                    self.view = ActiveView::Home;
                    debug!("Back to home from {}", room.as_str());
                    return Some(RouterAction::BackToHome { from: room });
                }
                if self.menu_button.hit(p) {
                    return Some(self.open_menu());
                }
                None
            }
            ActiveView::Home => {
                if self.menu_button.hit(p) {
                    return Some(self.open_menu());
                }
                let room = self.layout.zone_at(p)?.room;
                self.selected_room = Some(room);
                if room.has_detail_view() && self.room_view(room).is_some() {
                    self.view = ActiveView::Room(room);
                    debug!("Navigated to {}", room.as_str());
                    Some(RouterAction::Navigated { room })
                } else {
                    let on = self.toggle_power(room);
                    debug!("{} power {}", room.as_str(), on);
                    Some(RouterAction::RoomPower { room, on })
                }
            }
        }
    }

    fn dispatch_menu(&mut self, p: Point) -> RouterAction {
        if self.menu_button.hit(p) {
            return self.close_menu();
        }
        if self.logout_button.hit(p) {
            self.logout_button.pressed = true;
            return RouterAction::LogoutRequested;
        }
        if self.exit_button.button.hit(p) {
            return match self.exit_button.press() {
                ExitPress::Armed => RouterAction::ExitArmed,
                ExitPress::Confirmed => RouterAction::ExitConfirmed,
            };
        }
        self.close_menu()
    }

    fn open_menu(&mut self) -> RouterAction {
        self.menu_open = true;
        debug!("Menu opened");
        RouterAction::MenuOpened
    }

    fn close_menu(&mut self) -> RouterAction {
        self.menu_open = false;
        self.exit_button.disarm();
        debug!("Menu closed");
        RouterAction::MenuClosed
    }

    fn toggle_power(&mut self, room: RoomId) -> bool {
        match self.power.iter_mut().find(|p| p.room == room) {
            Some(entry) => {
                entry.on = !entry.on;
                entry.on
            }
            None => {
                self.power.push(RoomPower { room, on: true });
                true
            }
        }
    }

    /// Forward cursor and pinch state to the active room's widgets.
    pub fn update_widgets(
        &mut self,
        cursor: Option<Point>,
        pinch_rising_edge: bool,
        pinch_active: bool,
    ) -> Vec<WidgetActivity> {
        if self.menu_open {
            return Vec::new();
        }
        let ActiveView::Room(room) = self.view else {
            return Vec::new();
        };
        let Some(view) = self.room_view_mut(room) else {
            return Vec::new();
        };

        view.update_widgets(cursor, pinch_rising_edge, pinch_active)
            .into_iter()
            .filter_map(|(i, change)| {
                view.widget(i).map(|w| WidgetActivity {
                    room,
                    kind: w.kind,
                    label: w.label.clone(),
                    change,
                })
            })
            .collect()
    }

    /// Refresh cosmetic hover flags for buttons and the home floor plan.
    pub fn update_hover(&mut self, cursor: Option<Point>) {
        self.menu_button.update_hover(cursor);
        let menu_open = self.menu_open;
        self.logout_button.update_hover(cursor.filter(|_| menu_open));
        self.exit_button
            .button
            .update_hover(cursor.filter(|_| menu_open));
        if let ActiveView::Room(room) = self.view {
            if let Some(view) = self.room_view_mut(room) {
                view.back.update_hover(cursor.filter(|_| !menu_open));
            }
        }

        self.hovered_room = match (self.view, self.menu_open, cursor) {
            (ActiveView::Home, false, Some(p)) => self.layout.zone_at(p).map(|z| z.room),
            _ => None,
        };
    }

    /// Count down frame timers.  Called once per tick.
    pub fn tick(&mut self) {
        self.exit_button.tick();
    }

    /// New login: the logout control is no longer pressed.
    pub fn on_login(&mut self) {
        self.logout_button.pressed = false;
    }

    /// Logout completed.  The active view is kept.
    pub fn on_logout(&mut self) {
        self.menu_open = false;
        self.logout_button.pressed = false;
        self.exit_button.disarm();
        self.hovered_room = None;
    }

    /// Generate s-expression for status logging.
    pub fn status_sexp(&self) -> String {
        let selected = self
            .selected_room
            .map(|r| format!(":{}", r.as_str()))
            .unwrap_or_else(|| "nil".to_string());
        let powered: Vec<&str> = self
            .power
            .iter()
            .filter(|p| p.on)
            .map(|p| p.room.as_str())
            .collect();
        format!(
            "(:view :{} :menu-open {} :selected-room {} :exit-confirming {} :powered ({}) :zones {})",
            self.view.as_str(),
            if self.menu_open { "t" } else { "nil" },
            selected,
            if self.exit_button.confirming() { "t" } else { "nil" },
            powered.join(" "),
            self.layout.zones().len(),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    const MENU: Point = Point { x: 50.0, y: 50.0 };
    const LOGOUT: Point = Point { x: 100.0, y: 120.0 };
    const EXIT: Point = Point { x: 60.0, y: 180.0 };
    const BACK: Point = Point { x: 150.0, y: 50.0 };
    const NOWHERE: Point = Point { x: 1270.0, y: 710.0 };
    const LIGHT_BODY: Point = Point { x: 150.0, y: 250.0 };

    fn router() -> Router {
        Router::new(
            RouterConfig::default(),
            RoomLayout::defaults(Rect::new(0.0, 0.0, 1280.0, 720.0)),
        )
    }

    fn zone_point(r: &Router, room: RoomId) -> Point {
        r.layout()
            .zones()
            .iter()
            .find(|z| z.room == room)
            .map(|z| z.polygon.centroid())
            .unwrap()
    }

    #[test]
    fn test_home_zone_navigates() {
        let mut r = router();
        let p = zone_point(&r, RoomId::Bedroom);
        assert_eq!(
            r.dispatch(p),
            Some(RouterAction::Navigated {
                room: RoomId::Bedroom
            })
        );
        assert_eq!(r.view(), ActiveView::Room(RoomId::Bedroom));
        assert_eq!(r.selected_room(), Some(RoomId::Bedroom));
    }

    #[test]
    fn test_non_navigable_room_toggles_power() {
        let mut r = router();
        let p = zone_point(&r, RoomId::Hallway);
        assert_eq!(
            r.dispatch(p),
            Some(RouterAction::RoomPower {
                room: RoomId::Hallway,
                on: true
            })
        );
        assert_eq!(r.view(), ActiveView::Home);
        assert!(r.is_powered(RoomId::Hallway));
        r.dispatch(p);
        assert!(!r.is_powered(RoomId::Hallway));
    }

    #[test]
    fn test_empty_space_does_nothing() {
        let mut r = router();
        assert_eq!(r.dispatch(NOWHERE), None);
        assert_eq!(r.view(), ActiveView::Home);
    }

    #[test]
    fn test_menu_is_modal() {
        let mut r = router();
        assert_eq!(r.dispatch(MENU), Some(RouterAction::MenuOpened));
        assert!(r.menu_open());

        // A room zone under the overlay is unreachable; the click closes the menu
        let p = zone_point(&r, RoomId::Kitchen);
        assert_eq!(r.dispatch(p), Some(RouterAction::MenuClosed));
        assert!(!r.menu_open());
        assert_eq!(r.view(), ActiveView::Home);
    }

    #[test]
    fn test_menu_button_toggles_closed() {
        let mut r = router();
        r.dispatch(MENU);
        assert_eq!(r.dispatch(MENU), Some(RouterAction::MenuClosed));
    }

    #[test]
    fn test_logout_only_inside_menu() {
        let mut r = router();
        // Logout button is not reachable with the menu closed
        assert_ne!(r.dispatch(LOGOUT), Some(RouterAction::LogoutRequested));
        assert!(!r.logout_button.pressed);

        r.dispatch(MENU);
        assert_eq!(r.dispatch(LOGOUT), Some(RouterAction::LogoutRequested));
        assert!(r.logout_button.pressed);
        assert!(r.menu_open());
    }

    #[test]
    fn test_exit_requires_confirmation() {
        let mut r = router();
        r.dispatch(MENU);
        assert_eq!(r.dispatch(EXIT), Some(RouterAction::ExitArmed));
        assert!(r.exit_button.confirming());
        assert_eq!(r.dispatch(EXIT), Some(RouterAction::ExitConfirmed));
    }

    #[test]
    fn test_closing_menu_disarms_exit() {
        let mut r = router();
        r.dispatch(MENU);
        r.dispatch(EXIT);
        r.dispatch(NOWHERE);
        assert!(!r.exit_button.confirming());
        r.dispatch(MENU);
        assert_eq!(r.dispatch(EXIT), Some(RouterAction::ExitArmed));
    }

    #[test]
    fn test_exit_arm_expires_with_ticks() {
        let mut r = Router::new(
            RouterConfig {
                exit_confirm_frames: 2,
            },
            RoomLayout::defaults(Rect::new(0.0, 0.0, 1280.0, 720.0)),
        );
        r.dispatch(MENU);
        r.dispatch(EXIT);
        r.tick();
        r.tick();
        assert_eq!(r.dispatch(EXIT), Some(RouterAction::ExitArmed));
    }

    #[test]
    fn test_room_view_back_and_menu() {
        let mut r = router();
        r.dispatch(zone_point(&r, RoomId::Bathroom));
        // Zones are not reachable from a room view
        assert_eq!(r.dispatch(zone_point(&r, RoomId::Kitchen)), None);

        assert_eq!(r.dispatch(MENU), Some(RouterAction::MenuOpened));
        r.dispatch(NOWHERE);
        assert_eq!(r.view(), ActiveView::Room(RoomId::Bathroom));

        assert_eq!(
            r.dispatch(BACK),
            Some(RouterAction::BackToHome {
                from: RoomId::Bathroom
            })
        );
        assert_eq!(r.view(), ActiveView::Home);
    }

    #[test]
    fn test_widgets_only_reached_in_room_view() {
        let mut r = router();
        assert!(r.update_widgets(Some(LIGHT_BODY), true, true).is_empty());

        r.dispatch(zone_point(&r, RoomId::LivingRoom));
        let changes = r.update_widgets(Some(LIGHT_BODY), true, true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].room, RoomId::LivingRoom);
        assert_eq!(changes[0].describe(), "Living Room light switched on (100%)");

        // Menu overlay blocks widgets
        r.dispatch(MENU);
        assert!(r.update_widgets(Some(LIGHT_BODY), true, true).is_empty());
    }

    #[test]
    fn test_widget_state_persists_per_room() {
        let mut r = router();
        r.dispatch(zone_point(&r, RoomId::Kitchen));
        r.update_widgets(Some(LIGHT_BODY), true, true);
        r.dispatch(BACK);
        r.dispatch(zone_point(&r, RoomId::Bedroom));
        assert!(r
            .active_room_view()
            .is_some_and(|v| !v.widgets[0].is_active()));
        assert!(r
            .room_view(RoomId::Kitchen)
            .is_some_and(|v| v.widgets[0].is_active()));
    }

    #[test]
    fn test_home_hover() {
        let mut r = router();
        let p = zone_point(&r, RoomId::Kitchen);
        r.update_hover(Some(p));
        assert_eq!(r.hovered_room(), Some(RoomId::Kitchen));
        r.dispatch(MENU);
        r.update_hover(Some(p));
        assert_eq!(r.hovered_room(), None);
        r.update_hover(Some(MENU));
        assert!(r.menu_button.hovered);
    }

    #[test]
    fn test_on_logout_keeps_view() {
        let mut r = router();
        r.dispatch(zone_point(&r, RoomId::Bedroom));
        r.dispatch(MENU);
        r.dispatch(EXIT);
        r.dispatch(LOGOUT);
        r.on_logout();
        assert!(!r.menu_open());
        assert!(!r.logout_button.pressed);
        assert!(!r.exit_button.confirming());
        assert_eq!(r.view(), ActiveView::Room(RoomId::Bedroom));
    }

    #[test]
    fn test_action_descriptions() {
        assert_eq!(
            RouterAction::Navigated {
                room: RoomId::LivingRoom
            }
            .describe(),
            "switched to Living Room"
        );
        assert_eq!(
            RouterAction::RoomPower {
                room: RoomId::Hallway,
                on: false
            }
            .describe(),
            "Hallway switched off"
        );
    }

    #[test]
    fn test_status_sexp() {
        let mut r = router();
        r.dispatch(zone_point(&r, RoomId::Hallway));
        let sexp = r.status_sexp();
        assert!(sexp.contains(":view :home"));
        assert!(sexp.contains(":selected-room :hallway"));
        assert!(sexp.contains(":powered (hallway)"));
    }
}
