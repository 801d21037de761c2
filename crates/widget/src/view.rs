//! What the widget currently shows.

use cart_upsells_core::WidgetState;
use serde::Serialize;

/// The widget's visible surface: host visibility, loading indicator and
/// content region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    /// Lifecycle state.
    pub state: WidgetState,
    /// Whether the whole widget is hidden.
    pub hidden: bool,
    /// Whether the loading indicator is visible.
    pub loading: bool,
    /// Whether the content region is visible.
    pub content_visible: bool,
    /// Markup of the content region.
    pub content: Option<String>,
}

impl WidgetView {
    /// Enter `Idle` for a new activation; visibility is left as is.
    pub(crate) const fn reset(&mut self) {
        self.state = WidgetState::Idle;
    }

    /// A network fetch started.
    pub(crate) const fn begin_loading(&mut self) {
        self.state = WidgetState::Loading;
        self.hidden = false;
        self.loading = true;
        self.content_visible = false;
    }

    /// Swap new carousel markup into the content region.
    pub(crate) fn render(&mut self, markup: String) {
        self.state = WidgetState::Rendered;
        self.hidden = false;
        self.loading = false;
        self.content_visible = true;
        self.content = Some(markup);
    }

    /// Hide the widget entirely.
    pub(crate) fn hide(&mut self) {
        self.state = WidgetState::Hidden;
        self.hidden = true;
        self.loading = false;
        self.content_visible = false;
        self.content = None;
    }

    /// Stop showing the loading indicator without concluding.
    pub(crate) const fn stop_loading(&mut self) {
        self.loading = false;
    }
}
