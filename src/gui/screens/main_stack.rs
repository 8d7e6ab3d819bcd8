use std::convert::Infallible;

use iced::{Element, Task, time::Instant};

use crate::{
    core::{
        auth::User,
        geometry::GridGeometry,
        nav::{Navigator, Route},
    },
    gui::{
        AppState,
        screens::{
            Screen, ScreenMessage,
            site_detail::{SiteDetailParentMessage, SiteDetailScreen},
            site_list::{SiteListParentMessage, SiteListScreen},
        },
    },
};

/// Signed-in view: the site list with an optional detail screen pushed on
/// top. Mirrors the route stack in [`AppState::nav`].
#[derive(Debug, Clone)]
pub struct MainScreen {
    list: SiteListScreen,
    detail: Option<SiteDetailScreen>,
}

#[derive(Debug, Clone)]
pub enum MainMessage {
    SiteList(ScreenMessage<SiteListScreen>),
    SiteDetail(ScreenMessage<SiteDetailScreen>),
}

impl MainScreen {
    pub fn new(user: User, state: &mut AppState) -> (Self, Task<ScreenMessage<Self>>) {
        state.nav.reset();
        let (list, task) = SiteListScreen::new(user, state);
        let screen = Self { list, detail: None };
        (
            screen,
            task.map(MainMessage::SiteList)
                .map(ScreenMessage::ScreenMessage),
        )
    }

    pub fn is_animating(&self) -> bool {
        self.detail
            .as_ref()
            .is_some_and(SiteDetailScreen::is_animating)
    }

    pub fn on_frame(&mut self, now: Instant) {
        if let Some(detail) = &mut self.detail {
            detail.on_frame(now);
        }
    }

    pub fn on_resize(&mut self, geometry: GridGeometry, drawer_width: f32) {
        if let Some(detail) = &mut self.detail {
            detail.on_resize(geometry, drawer_width);
        }
    }
}

impl Screen for MainScreen {
    type Message = MainMessage;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match &self.detail {
            Some(detail) => detail.view().map(MainMessage::SiteDetail),
            None => self.list.view().map(MainMessage::SiteList),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        let task = match message {
            MainMessage::SiteList(ScreenMessage::ScreenMessage(msg)) => self
                .list
                .update(msg, state)
                .map(MainMessage::SiteList),
            MainMessage::SiteList(ScreenMessage::ParentMessage(
                SiteListParentMessage::OpenSite(site),
            )) => {
                tracing::info!(site = %site.name, "opening site");
                state.nav.push(Route::SiteDetail(site.clone()));
                self.detail = Some(SiteDetailScreen::new(site, state));
                Task::none()
            }
            MainMessage::SiteDetail(ScreenMessage::ScreenMessage(msg)) => match &mut self.detail {
                Some(detail) => detail.update(msg, state).map(MainMessage::SiteDetail),
                None => Task::none(),
            },
            MainMessage::SiteDetail(ScreenMessage::ParentMessage(
                SiteDetailParentMessage::Home,
            )) => {
                // The drawer already popped the route.
                if matches!(state.nav.current(), Route::SiteList) {
                    self.detail = None;
                }
                Task::none()
            }
        };
        task.map(ScreenMessage::ScreenMessage)
    }
}
