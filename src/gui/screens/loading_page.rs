use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{column, container, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

/// Shown until the backend is open and the stored session is resolved.
#[derive(Debug, Clone, Default)]
pub struct LoadingPageScreen {
    failure: Option<String>,
}

impl LoadingPageScreen {
    /// Startup failed. Nothing else can be shown without a backend.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
        }
    }
}

impl Screen for LoadingPageScreen {
    type Message = Infallible;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content = match &self.failure {
            None => column![text("Loading...")],
            Some(reason) => column![
                text("Could not start").size(24),
                text(reason.as_str()).size(14),
            ]
            .spacing(10)
            .align_x(Center),
        };
        container(content)
            .padding(20)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
