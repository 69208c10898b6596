#![forbid(unsafe_code)]

//! The page controller.
//!
//! [`PageController`] owns all page state (active category, interaction
//! counter, reveal set, pending reverts) and applies every effect through an
//! injected [`PageView`]. The host forwards four kinds of events to it:
//!
//! | Host event                  | Method                                   |
//! |-----------------------------|------------------------------------------|
//! | category control clicked    | [`on_nav_click`](PageController::on_nav_click) / [`on_filter_select`](PageController::on_filter_select) |
//! | action control clicked      | [`on_interact`](PageController::on_interact) |
//! | same-page anchor activated  | [`on_navigate`](PageController::on_navigate) |
//! | window scrolled             | [`on_scroll`](PageController::on_scroll) |
//!
//! plus [`on_ready`](PageController::on_ready) once and
//! [`advance_to`](PageController::advance_to) whenever time passes.

use core::time::Duration;
use std::collections::HashSet;

use tracing::{debug, info, trace};

use crate::config::PageConfig;
use crate::error::{ElementRole, PageError};
use crate::filter::{CategoryFilter, FilterOutcome};
use crate::timer::{DeterministicClock, TimerQueue};
use crate::view::{ElementId, PageView, StyleProperty};

/// What a pending timer is attached to. One pending revert per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TimerKey {
    /// Acknowledgement label and background of an action control.
    Control(ElementId),
    /// Press scale of an item.
    ItemPress(ElementId),
    /// Pulse scale of the counter container.
    CounterPulse,
    /// Staggered fade-in of an item.
    FadeIn(ElementId),
}

/// Deferred effect applied when its timer fires.
#[derive(Debug, Clone, PartialEq)]
enum Revert {
    RestoreControl { control: ElementId, label: String },
    SetStyle { el: ElementId, property: StyleProperty, value: String },
    /// End of an item press: back to the revealed transform, or to none.
    ReleaseItem(ElementId),
    FadeIn(ElementId),
}

/// Result of a same-page anchor activation.
///
/// Default navigation is suppressed in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// The target exists and was scrolled into view.
    Scrolled(ElementId),
    /// No element matches the fragment; the activation is absorbed.
    NoTarget,
}

impl NavigateOutcome {
    /// Whether the host must cancel the browser's default jump.
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        true
    }
}

/// Strip the leading `#` from an anchor fragment.
///
/// Returns `None` for an empty fragment.
#[must_use]
pub fn fragment_id(fragment: &str) -> Option<&str> {
    let id = fragment.strip_prefix('#').unwrap_or(fragment);
    (!id.is_empty()).then_some(id)
}

/// Whether an element whose top edge sits at `top` is inside the reveal band.
#[must_use]
pub fn within_reveal_band(top: f64, viewport_height: f64, offset: f64) -> bool {
    top < viewport_height - offset
}

/// Structural elements resolved once at mount.
#[derive(Debug, Clone)]
struct PageElements {
    counter_container: ElementId,
    counter_display: ElementId,
    nav_controls: Vec<ElementId>,
    action_controls: Vec<ElementId>,
    /// The page never adds or removes watched elements after load.
    reveal_targets: Vec<ElementId>,
}

/// Event-driven controller for the profile page.
pub struct PageController<V: PageView> {
    view: V,
    config: PageConfig,
    elements: PageElements,
    clock: DeterministicClock,
    timers: TimerQueue<TimerKey, Revert>,
    counter: u64,
    filter: CategoryFilter,
    revealed: HashSet<ElementId>,
}

impl<V: PageView> PageController<V> {
    /// Validate `config`, resolve the page structure, and take ownership of
    /// the view.
    ///
    /// Fails fast when the counter container or display is missing instead
    /// of deferring the fault to the first interaction.
    pub fn mount(view: V, config: PageConfig) -> Result<Self, PageError> {
        let config = config.into_validated()?;
        let selectors = &config.selectors;

        let require = |role: ElementRole, id: &str| {
            view.by_id(id).ok_or_else(|| PageError::MissingElement {
                role,
                selector: format!("#{id}"),
            })
        };
        let counter_container =
            require(ElementRole::CounterContainer, &selectors.counter_container_id)?;
        let counter_display = require(ElementRole::CounterDisplay, &selectors.counter_display_id)?;

        let elements = PageElements {
            counter_container,
            counter_display,
            nav_controls: view.query_all(&selectors.nav_controls),
            action_controls: view.query_all(&selectors.action_controls),
            reveal_targets: view.query_all(&selectors.reveal_targets),
        };
        info!(
            nav_controls = elements.nav_controls.len(),
            action_controls = elements.action_controls.len(),
            reveal_targets = elements.reveal_targets.len(),
            "page controller mounted"
        );

        Ok(Self {
            view,
            config,
            elements,
            clock: DeterministicClock::new(),
            timers: TimerQueue::new(),
            counter: 0,
            filter: CategoryFilter::All,
            revealed: HashSet::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    /// Page-ready initialization: log, show every category, reveal what is
    /// already in view.
    pub fn on_ready(&mut self) {
        info!(ready_message = %self.config.ready_message, "page ready");
        self.view.console_log(&self.config.ready_message);
        self.on_filter_select(crate::filter::ALL_TOKEN);
        self.on_scroll();
    }

    /// Select a category by token.
    ///
    /// The first navigation control carrying the token becomes the active
    /// control; when none carries it, no control is active.
    pub fn on_filter_select(&mut self, category: &str) -> FilterOutcome {
        let attr = &self.config.selectors.category_attribute;
        let target = self
            .elements
            .nav_controls
            .iter()
            .copied()
            .find(|&c| self.view.attribute(c, attr).as_deref() == Some(category));
        self.mark_active(target);
        self.apply_filter(CategoryFilter::from_token(category))
    }

    /// A navigation control was clicked: it becomes the active control and
    /// its category token is applied.
    pub fn on_nav_click(&mut self, control: ElementId) -> FilterOutcome {
        let token = self
            .view
            .attribute(control, &self.config.selectors.category_attribute)
            .unwrap_or_default();
        self.mark_active(Some(control));
        self.apply_filter(CategoryFilter::from_token(&token))
    }

    /// An action control was clicked. Returns the new counter value.
    pub fn on_interact(&mut self, control: ElementId) -> u64 {
        let now = self.clock.now();
        let timing = self.config.timing.clone();
        let feedback = &self.config.feedback;
        let elements = &self.elements;

        self.counter = self.counter.saturating_add(1);
        self.view
            .set_text(elements.counter_display, &self.counter.to_string());
        self.view
            .add_class(elements.counter_container, &feedback.show_class);

        if let Some(item) = self.view.closest(control, &self.config.selectors.items) {
            self.view
                .set_style(item, StyleProperty::Transform, &feedback.item_press_transform);
            self.timers.schedule(
                TimerKey::ItemPress(item),
                now + timing.item_press(),
                Revert::ReleaseItem(item),
            );
        }

        // A restarted window must still restore the label from before the
        // first acknowledgement.
        let label = match self.timers.pending(&TimerKey::Control(control)) {
            Some(Revert::RestoreControl { label, .. }) => label.clone(),
            _ => self.view.text(control),
        };
        self.view.set_text(control, &feedback.acknowledgement_label);
        self.view.set_style(
            control,
            StyleProperty::Background,
            &feedback.acknowledgement_color,
        );
        self.timers.schedule(
            TimerKey::Control(control),
            now + timing.label_revert(),
            Revert::RestoreControl { control, label },
        );

        self.view.set_style(
            elements.counter_container,
            StyleProperty::Transform,
            &feedback.counter_pulse_transform,
        );
        self.timers.schedule(
            TimerKey::CounterPulse,
            now + timing.counter_pulse(),
            Revert::SetStyle {
                el: elements.counter_container,
                property: StyleProperty::Transform,
                value: feedback.counter_rest_transform.clone(),
            },
        );

        debug!(%control, count = self.counter, "interaction counted");
        self.counter
    }

    /// A same-page anchor was activated with `fragment` (`"#about"` or
    /// `"about"`).
    pub fn on_navigate(&mut self, fragment: &str) -> NavigateOutcome {
        let target = fragment_id(fragment).and_then(|id| self.view.by_id(id));
        match target {
            Some(el) => {
                self.view.scroll_into_view(el);
                debug!(fragment, target = %el, "smooth scroll");
                NavigateOutcome::Scrolled(el)
            }
            None => {
                debug!(fragment, "anchor has no target");
                NavigateOutcome::NoTarget
            }
        }
    }

    /// Reveal every watched element that has entered the reveal band.
    ///
    /// Every in-band element gets the revealed style on every pass, so a
    /// transform cleared by other feedback is restored. Returns how many
    /// elements were revealed for the first time. Revealed elements stay
    /// revealed.
    pub fn on_scroll(&mut self) -> usize {
        let viewport_height = self.view.viewport_height();
        let reveal = &self.config.reveal;
        let mut newly = 0;
        for &el in &self.elements.reveal_targets {
            if within_reveal_band(self.view.element_top(el), viewport_height, reveal.offset_px) {
                self.view
                    .set_style(el, StyleProperty::Opacity, &reveal.revealed_opacity);
                self.view
                    .set_style(el, StyleProperty::Transform, &reveal.revealed_transform);
                if self.revealed.insert(el) {
                    newly += 1;
                }
            }
        }
        trace!(newly, total = self.revealed.len(), "reveal pass");
        newly
    }

    /// Move the clock to `now` and run every revert that has come due.
    ///
    /// Returns the number of reverts applied.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        self.clock.set(now);
        let due = self.timers.drain_due(self.clock.now());
        let fired = due.len();
        for revert in due {
            self.apply_revert(revert);
        }
        if fired > 0 {
            trace!(fired, now_ms = self.clock.now().as_millis() as u64, "timers fired");
        }
        fired
    }

    /// Advance the clock by `dt`. See [`advance_to`](Self::advance_to).
    pub fn advance_by(&mut self, dt: Duration) -> usize {
        let now = self.clock.now().saturating_add(dt);
        self.advance_to(now)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    #[must_use]
    pub fn active_category(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.revealed.contains(&el)
    }

    /// Earliest pending revert, for hosts that arm a real timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn nav_controls(&self) -> &[ElementId] {
        &self.elements.nav_controls
    }

    #[must_use]
    pub fn action_controls(&self) -> &[ElementId] {
        &self.elements.action_controls
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn into_view(self) -> V {
        self.view
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn mark_active(&mut self, control: Option<ElementId>) {
        let class = &self.config.feedback.active_class;
        for &c in &self.elements.nav_controls {
            self.view.remove_class(c, class);
        }
        if let Some(c) = control {
            self.view.add_class(c, class);
        }
    }

    fn apply_filter(&mut self, filter: CategoryFilter) -> FilterOutcome {
        let now = self.clock.now();
        let stagger = self.config.timing.fade_stagger();
        let attr = &self.config.selectors.category_attribute;
        let feedback = &self.config.feedback;
        let mut outcome = FilterOutcome::default();

        for item in self.view.query_all(&self.config.selectors.items) {
            let category = self.view.attribute(item, attr);
            if filter.matches(category.as_deref()) {
                self.view.remove_class(item, &feedback.hidden_class);
                if filter == CategoryFilter::All && !stagger.is_zero() {
                    self.timers
                        .schedule(TimerKey::FadeIn(item), now + stagger, Revert::FadeIn(item));
                } else {
                    self.timers.cancel(&TimerKey::FadeIn(item));
                    self.view
                        .set_style(item, StyleProperty::Animation, &feedback.fade_in_animation);
                }
                outcome.visible += 1;
            } else {
                self.timers.cancel(&TimerKey::FadeIn(item));
                self.view.add_class(item, &feedback.hidden_class);
                outcome.hidden += 1;
            }
        }

        debug!(
            category = %filter,
            visible = outcome.visible,
            hidden = outcome.hidden,
            "filter applied"
        );
        self.filter = filter;
        outcome
    }

    fn apply_revert(&mut self, revert: Revert) {
        match revert {
            Revert::RestoreControl { control, label } => {
                self.view.set_text(control, &label);
                self.view.clear_style(control, StyleProperty::Background);
            }
            Revert::SetStyle { el, property, value } => self.view.set_style(el, property, &value),
            Revert::ReleaseItem(item) if self.revealed.contains(&item) => self.view.set_style(
                item,
                StyleProperty::Transform,
                &self.config.reveal.revealed_transform,
            ),
            Revert::ReleaseItem(item) => self.view.clear_style(item, StyleProperty::Transform),
            Revert::FadeIn(item) => self.view.set_style(
                item,
                StyleProperty::Animation,
                &self.config.feedback.fade_in_animation,
            ),
        }
    }
}
