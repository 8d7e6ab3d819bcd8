pub mod loading_page;
pub mod login_page;
pub mod main_stack;
pub mod site_detail;
pub mod site_list;

use iced::{Element, Task, time::Instant};

use crate::{
    core::geometry::GridGeometry,
    gui::{AppState, Message},
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug;
    type ParentMessage: std::fmt::Debug;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

/// One screen per session gate state.
#[derive(Debug)]
pub enum ScreenData {
    LoadingPage(loading_page::LoadingPageScreen),
    LoginPage(login_page::LoginScreen),
    Main(main_stack::MainScreen),
}

impl ScreenData {
    pub fn is_animating(&self) -> bool {
        match self {
            ScreenData::Main(screen) => screen.is_animating(),
            _ => false,
        }
    }

    pub fn on_frame(&mut self, now: Instant) {
        if let ScreenData::Main(screen) = self {
            screen.on_frame(now);
        }
    }

    pub fn on_resize(&mut self, geometry: GridGeometry, drawer_width: f32) {
        if let ScreenData::Main(screen) = self {
            screen.on_resize(geometry, drawer_width);
        }
    }
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::LoadingPage(screen) => screen.view().map(Message::LoadingPage),
            ScreenData::LoginPage(screen) => screen.view().map(Message::LoginPage),
            ScreenData::Main(screen) => screen.view().map(Message::Main),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (ScreenData::LoginPage(page), Message::LoginPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::LoginPage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(never) => match never {},
            },
            (ScreenData::Main(screen), Message::Main(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => screen
                    .update(msg, state)
                    .map(Message::Main)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(never) => match never {},
            },
            (_, message) => {
                tracing::debug!(?message, "message for an inactive screen");
                Task::none()
            }
        }
    }
}
