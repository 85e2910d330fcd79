//! Dashboard UI state: room zones, buttons, device widgets, room views
//! and the hit-test router that ties them together.

pub mod buttons;
pub mod room_view;
pub mod router;
pub mod widget;
pub mod zones;

pub use buttons::{Button, ButtonKind, ExitButton};
pub use room_view::RoomDetailView;
pub use router::{ActiveView, RoomPower, Router, RouterAction, RouterConfig, WidgetActivity};
pub use widget::{SliderAxis, SliderWidget, WidgetChange, WidgetKind};
pub use zones::{RoomId, RoomLayout, RoomZone};
