//! Per-room detail view: a back button plus the room's device widgets.

use serde::Serialize;

use super::buttons::{Button, ButtonKind};
use super::widget::{SliderWidget, WidgetChange};
use super::zones::RoomId;
use crate::geometry::{Point, Rect};

/// Body rectangles of the standard widget column.
const LIGHT_BODY: Rect = Rect {
    x: 100.0,
    y: 200.0,
    width: 220.0,
    height: 120.0,
};
const BLIND_BODY: Rect = Rect {
    x: 100.0,
    y: 400.0,
    width: 220.0,
    height: 120.0,
};

#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailView {
    pub room: RoomId,
    pub back: Button,
    pub widgets: Vec<SliderWidget>,
}

impl RoomDetailView {
    pub fn new(room: RoomId, widgets: Vec<SliderWidget>) -> Self {
        Self {
            room,
            back: Button::new(ButtonKind::Back),
            widgets,
        }
    }

    /// One dimmable light and one blind.
    pub fn standard(room: RoomId) -> Self {
        Self::new(
            room,
            vec![
                SliderWidget::light("Light", LIGHT_BODY),
                SliderWidget::blind("Blind", BLIND_BODY),
            ],
        )
    }

    /// Forward this frame's cursor and pinch state to every widget.
    pub fn update_widgets(
        &mut self,
        cursor: Option<Point>,
        pinch_rising_edge: bool,
        pinch_active: bool,
    ) -> Vec<(usize, WidgetChange)> {
        self.widgets
            .iter_mut()
            .enumerate()
            .filter_map(|(i, w)| {
                w.update(cursor, pinch_rising_edge, pinch_active)
                    .map(|change| (i, change))
            })
            .collect()
    }

    pub fn widget(&self, index: usize) -> Option<&SliderWidget> {
        self.widgets.get(index)
    }

    pub fn widget_mut(&mut self, index: usize) -> Option<&mut SliderWidget> {
        self.widgets.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_is_disjoint() {
        let view = RoomDetailView::standard(RoomId::Bedroom);
        assert_eq!(view.widgets.len(), 2);
        let mut rects = vec![view.back.rect];
        for w in &view.widgets {
            rects.push(w.body);
            rects.push(w.panel);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_update_reports_changed_widget() {
        let mut view = RoomDetailView::standard(RoomId::Kitchen);
        let changes = view.update_widgets(Some(Point::new(150.0, 250.0)), true, true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, 0);
        assert!(matches!(changes[0].1, WidgetChange::SwitchedOn { .. }));
        assert!(view.widget(0).is_some_and(|w| w.is_active()));
        assert!(view.widget(1).is_some_and(|w| w.is_active()));
    }
}
