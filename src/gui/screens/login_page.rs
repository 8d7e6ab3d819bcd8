use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, image, row, stack, text, text_input},
};

use crate::{
    core::{auth, error::KioskError},
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{panel_style, scrim_style},
    },
};

const LOGO: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/logo.png"));

/// Blocking message shown after a failed sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub detail: String,
}

impl From<KioskError> for Notice {
    fn from(err: KioskError) -> Self {
        Self {
            title: err.title(),
            detail: err.detail(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    email: String,
    password: String,
    busy: bool,
    notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub enum LoginMessage {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    Finished(Result<(), Notice>),
    DismissNotice,
}

impl LoginScreen {
    fn form(&self) -> Element<'_, ScreenMessage<Self>> {
        let editable = !self.busy && self.notice.is_none();
        let on_email = editable.then_some(|value: String| {
            ScreenMessage::ScreenMessage(LoginMessage::EmailChanged(value))
        });
        let on_password = editable.then_some(|value: String| {
            ScreenMessage::ScreenMessage(LoginMessage::PasswordChanged(value))
        });
        let submit = editable.then_some(ScreenMessage::ScreenMessage(LoginMessage::Submit));

        let email = text_input("Email", &self.email)
            .on_input_maybe(on_email)
            .on_submit_maybe(submit.clone())
            .padding(12);
        let password = text_input("Password", &self.password)
            .secure(true)
            .on_input_maybe(on_password)
            .on_submit_maybe(submit.clone())
            .padding(12);
        let label = if self.busy { "Signing in..." } else { "Sign In" };

        column![
            image(image::Handle::from_bytes(LOGO)).width(Length::Fixed(120.0)),
            text("Jobsite Kiosk").size(28),
            email,
            password,
            button(container(text(label)).center_x(Length::Fill))
                .width(Length::Fill)
                .padding(12)
                .on_press_maybe(submit),
        ]
        .spacing(16)
        .padding(24)
        .max_width(420)
        .align_x(Center)
        .into()
    }
}

impl Screen for LoginScreen {
    type Message = LoginMessage;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let form = container(self.form())
            .center_x(Length::Fill)
            .center_y(Length::Fill);

        let Some(notice) = &self.notice else {
            return form.into();
        };
        let dialog = container(
            column![
                text(notice.title).size(20),
                text(notice.detail.as_str()),
                row![
                    button("OK")
                        .on_press(ScreenMessage::ScreenMessage(LoginMessage::DismissNotice))
                ],
            ]
            .spacing(12)
            .padding(20)
            .max_width(360),
        )
        .style(panel_style);

        stack![
            form,
            container(dialog)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(scrim_style(1.0)),
        ]
        .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            LoginMessage::EmailChanged(value) => {
                self.email = value;
                Task::none()
            }
            LoginMessage::PasswordChanged(value) => {
                self.password = value;
                Task::none()
            }
            LoginMessage::Submit => {
                if self.busy {
                    return Task::none();
                }
                let Some(backend) = state.backend() else {
                    tracing::warn!("sign in requested before the backend is ready");
                    return Task::none();
                };
                self.busy = true;
                let email = self.email.clone();
                let password = self.password.clone();
                Task::perform(
                    async move {
                        auth::sign_in(&*backend, &email, &password)
                            .await
                            .map(|_| ())
                            .map_err(Notice::from)
                    },
                    |result| ScreenMessage::ScreenMessage(LoginMessage::Finished(result)),
                )
            }
            LoginMessage::Finished(result) => {
                self.busy = false;
                match result {
                    Ok(()) => self.password.clear(),
                    Err(notice) => {
                        tracing::info!(title = notice.title, "sign in rejected");
                        self.notice = Some(notice);
                    }
                }
                Task::none()
            }
            LoginMessage::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }
}
