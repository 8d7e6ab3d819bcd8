use std::sync::Arc;

use iced::{Size, time::Instant};

use crate::{
    core::{
        auth::{Session, SessionEvent},
        backend::Backend,
    },
    gui::screens::{
        ScreenMessage, loading_page::LoadingPageScreen, login_page::LoginScreen,
        main_stack::MainScreen,
    },
};

#[derive(Debug, Clone)]
pub enum Message {
    BackendReady(Result<Arc<Backend>, String>),
    SessionResolved(Option<Session>),
    Session(SessionEvent),
    CheckExpiry,
    ExpiryChecked(Option<Session>),
    Resized(Size),
    Frame(Instant),
    LoadingPage(ScreenMessage<LoadingPageScreen>),
    LoginPage(ScreenMessage<LoginScreen>),
    Main(ScreenMessage<MainScreen>),
}
