use std::{sync::Arc, time::Duration};

use iced::{Element, Size, Subscription, Task, Theme, time, window};
use ::time::OffsetDateTime;

use super::{AppState, Message};
use crate::{
    config::KioskConfig,
    core::{
        auth::{self, AuthClient, GateState},
        backend::Backend,
    },
    gui::screens::{
        Screen, ScreenData, ScreenMessage, loading_page::LoadingPageScreen,
        login_page::LoginScreen, main_stack::MainScreen,
    },
};

const INITIAL_SIZE: Size = Size::new(430.0, 880.0);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const EXPIRY_CHECK_INTERVAL: Duration = Duration::from_secs(30);

pub struct KioskApp {
    state: AppState,
    screen: ScreenData,
}

/// Open the window and block until it is closed.
pub fn run(config: KioskConfig) -> anyhow::Result<()> {
    iced::application(
        move || KioskApp::boot(config.clone()),
        KioskApp::update,
        KioskApp::view,
    )
    .title(KioskApp::title)
    .subscription(KioskApp::subscription)
    .theme(KioskApp::theme)
    .window_size(INITIAL_SIZE)
    .run()
    .map_err(|err| anyhow::anyhow!("GUI failed: {err}"))
}

impl KioskApp {
    /// Backends are opened on the GUI runtime so their pools live as long as
    /// the window.
    fn boot(config: KioskConfig) -> (Self, Task<Message>) {
        let app = Self {
            state: AppState::new(config.clone(), INITIAL_SIZE.width),
            screen: ScreenData::LoadingPage(LoadingPageScreen::default()),
        };
        let task = Task::perform(
            async move {
                Backend::from_config(&config)
                    .await
                    .map(Arc::new)
                    .map_err(|err| format!("{err:#}"))
            },
            Message::BackendReady,
        );
        (app, task)
    }

    fn title(&self) -> String {
        match self.state.gate.state() {
            GateState::Authenticated(session) => {
                format!("Jobsite Kiosk - {}", session.user.email)
            }
            _ => "Jobsite Kiosk".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BackendReady(Ok(backend)) => {
                tracing::info!(kind = ?backend.kind(), "backend ready");
                // Subscribe before the lookup so an expiry found by it is seen.
                let events = backend.subscribe().into_stream();
                self.state.backend = Some(backend.clone());
                Task::batch([
                    Task::run(events, Message::Session),
                    Task::perform(
                        async move { auth::initial_session(&*backend).await },
                        Message::SessionResolved,
                    ),
                ])
            }
            Message::BackendReady(Err(reason)) => {
                tracing::error!("backend failed to open: {reason}");
                self.screen = ScreenData::LoadingPage(LoadingPageScreen::failed(reason));
                Task::none()
            }
            Message::SessionResolved(session) => {
                self.state.gate.resolve(session);
                self.sync_screen()
            }
            Message::Session(event) => {
                if self.state.gate.apply(event) {
                    self.sync_screen()
                } else {
                    Task::none()
                }
            }
            Message::CheckExpiry => {
                let expired = self
                    .state
                    .gate
                    .session()
                    .is_some_and(|session| session.is_expired());
                match self.state.backend() {
                    // The backend refreshes or drops the session and tells the hub.
                    Some(backend) if expired => Task::perform(
                        async move { auth::initial_session(&*backend).await },
                        Message::ExpiryChecked,
                    ),
                    _ => Task::none(),
                }
            }
            Message::ExpiryChecked(session) => {
                if session.is_none() && self.state.gate.check_expiry(OffsetDateTime::now_utc()) {
                    self.sync_screen()
                } else {
                    Task::none()
                }
            }
            Message::Resized(size) => {
                self.state.window_width = size.width;
                self.screen
                    .on_resize(self.state.geometry(), self.state.drawer_width());
                Task::none()
            }
            Message::Frame(now) => {
                self.screen.on_frame(now);
                Task::none()
            }
            message @ (Message::LoadingPage(_) | Message::LoginPage(_) | Message::Main(_)) => self
                .screen
                .update(message, &mut self.state)
                .map(|message| match message {
                    ScreenMessage::ScreenMessage(message) => message,
                    ScreenMessage::ParentMessage(never) => match never {},
                }),
        }
    }

    /// Swap the screen to match the gate.
    fn sync_screen(&mut self) -> Task<Message> {
        match self.state.gate.state() {
            GateState::Loading => Task::none(),
            GateState::Unauthenticated => {
                if !matches!(self.screen, ScreenData::LoginPage(_)) {
                    self.state.nav.reset();
                    self.screen = ScreenData::LoginPage(LoginScreen::default());
                }
                Task::none()
            }
            GateState::Authenticated(session) => {
                if matches!(self.screen, ScreenData::Main(_)) {
                    return Task::none();
                }
                let user = session.user.clone();
                let (screen, task) = MainScreen::new(user, &mut self.state);
                self.screen = ScreenData::Main(screen);
                task.map(Message::Main)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(|message| match message {
            ScreenMessage::ScreenMessage(message) => message,
            ScreenMessage::ParentMessage(never) => match never {},
        })
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions =
            vec![window::resize_events().map(|(_id, size)| Message::Resized(size))];
        if self.state.gate.session().is_some() {
            subscriptions.push(time::every(EXPIRY_CHECK_INTERVAL).map(|_| Message::CheckExpiry));
        }
        if self.screen.is_animating() {
            subscriptions.push(time::every(FRAME_INTERVAL).map(Message::Frame));
        }
        Subscription::batch(subscriptions)
    }
}
