//! Side drawer of the site detail screen.
//!
//! The drawer is a two-state machine (`Open`/`Closed`) plus a visible
//! progress in `[0, 1]`. Transitions are driven by [`Drawer::tick`]; the
//! state only flips once a transition reaches its target, which is reported
//! back as a [`TransitionComplete`].

use std::time::Duration;

use crate::core::nav::Navigator;

pub const OPEN_DURATION: Duration = Duration::from_millis(250);
pub const CLOSE_DURATION: Duration = Duration::from_millis(200);
pub const DEFAULT_WIDTH_RATIO: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuSection {
    Plans,
    Specifications,
    Photos,
    Crew,
    LockoutTagout,
    DailyReports,
    Rfis,
    Submittals,
}

impl MenuSection {
    /// Top-level entries, in menu order.
    pub const MAIN: [MenuSection; 5] = [
        MenuSection::Plans,
        MenuSection::Specifications,
        MenuSection::Photos,
        MenuSection::Crew,
        MenuSection::LockoutTagout,
    ];

    /// Children of the expandable group.
    pub const PROJECT_MANAGEMENT: [MenuSection; 3] = [
        MenuSection::DailyReports,
        MenuSection::Rfis,
        MenuSection::Submittals,
    ];

    pub const GROUP_LABEL: &'static str = "Project Management";

    pub fn label(self) -> &'static str {
        match self {
            MenuSection::Plans => "Plans",
            MenuSection::Specifications => "Specifications",
            MenuSection::Photos => "Photos",
            MenuSection::Crew => "Crew",
            MenuSection::LockoutTagout => "Lockout / Tagout",
            MenuSection::DailyReports => "Daily Reports",
            MenuSection::Rfis => "RFIs",
            MenuSection::Submittals => "Submittals",
        }
    }

    pub fn in_group(self) -> bool {
        Self::PROJECT_MANAGEMENT.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerState {
    Open,
    Closed,
}

impl DrawerState {
    fn progress(self) -> f32 {
        match self {
            DrawerState::Open => 1.0,
            DrawerState::Closed => 0.0,
        }
    }
}

/// A transition reached its target and the drawer state flipped to `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionComplete {
    pub state: DrawerState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    target: DrawerState,
    from: f32,
    elapsed: Duration,
    duration: Duration,
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Drawer {
    state: DrawerState,
    progress: f32,
    transition: Option<Transition>,
    width: f32,
    active: MenuSection,
    group_expanded: bool,
}

impl Drawer {
    /// Starts fully open on the Plans section.
    pub fn new(width: f32) -> Self {
        Self {
            state: DrawerState::Open,
            progress: 1.0,
            transition: None,
            width: width.max(0.0),
            active: MenuSection::Plans,
            group_expanded: false,
        }
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DrawerState::Open
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The panel and its overlay are on screen, settled or sliding.
    pub fn is_visible(&self) -> bool {
        self.is_open() || self.is_animating()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Horizontal offset: 0 is fully shown, `-width` fully hidden.
    pub fn offset(&self) -> f32 {
        -self.width * (1.0 - self.progress)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    pub fn active(&self) -> MenuSection {
        self.active
    }

    pub fn active_label(&self) -> &'static str {
        self.active.label()
    }

    pub fn group_expanded(&self) -> bool {
        self.group_expanded
    }

    pub fn open(&mut self) {
        self.animate_to(DrawerState::Open);
    }

    pub fn close(&mut self) {
        self.animate_to(DrawerState::Closed);
    }

    fn animate_to(&mut self, target: DrawerState) {
        let heading = self.transition.map(|transition| transition.target);
        if heading == Some(target) || (heading.is_none() && self.state == target) {
            return;
        }
        let full = match target {
            DrawerState::Open => OPEN_DURATION,
            DrawerState::Closed => CLOSE_DURATION,
        };
        // Retargeting mid-slide only covers the remaining distance.
        let distance = (target.progress() - self.progress).abs();
        let duration = if distance >= 1.0 {
            full
        } else {
            full.mul_f32(distance)
        };
        self.transition = Some(Transition {
            target,
            from: self.progress,
            elapsed: Duration::ZERO,
            duration,
        });
    }

    /// Advance the running transition by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TransitionComplete> {
        let transition = self.transition.as_mut()?;
        transition.elapsed += elapsed;
        let t = if transition.duration.is_zero() {
            1.0
        } else {
            (transition.elapsed.as_secs_f32() / transition.duration.as_secs_f32()).min(1.0)
        };
        let to = transition.target.progress();
        self.progress = transition.from + (to - transition.from) * ease_in_out(t);

        if t < 1.0 {
            return None;
        }
        let state = transition.target;
        self.transition = None;
        self.progress = state.progress();
        self.state = state;
        tracing::debug!(?state, "drawer transition complete");
        Some(TransitionComplete { state })
    }

    /// Activate a menu entry and slide the drawer away.
    pub fn select_section(&mut self, section: MenuSection) {
        self.active = section;
        self.close();
    }

    pub fn toggle_group(&mut self) {
        self.group_expanded = !self.group_expanded;
    }

    /// Close the drawer and leave the detail screen.
    pub fn go_home<N: Navigator>(&mut self, navigator: &mut N) -> bool {
        self.close();
        navigator.pop()
    }
}
