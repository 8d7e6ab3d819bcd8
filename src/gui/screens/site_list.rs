use iced::{
    Element, Length, Task,
    widget::{button, column, container, scrollable, text, text_input},
};

use crate::{
    core::{
        auth::{AuthClient, User},
        db::Site,
        sites::{DirectoryStatus, LoadTicket, SiteDirectory, SiteListing, load_sites},
    },
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{divider, empty_state, top_bar},
    },
};

#[derive(Debug, Clone)]
pub struct SiteListScreen {
    user: User,
    directory: SiteDirectory,
    signing_out: bool,
}

#[derive(Debug, Clone)]
pub enum SiteListMessage {
    Load,
    Refresh,
    Loaded(LoadTicket, Result<SiteListing, String>),
    QueryChanged(String),
    ToggleSearch,
    Open(Site),
    SignOut,
    SignedOut(Result<(), String>),
}

#[derive(Debug, Clone)]
pub enum SiteListParentMessage {
    OpenSite(Site),
}

impl SiteListScreen {
    /// The list fetches its sites as soon as it is mounted.
    pub fn new(user: User, state: &AppState) -> (Self, Task<ScreenMessage<Self>>) {
        let mut screen = Self {
            user,
            directory: SiteDirectory::new(),
            signing_out: false,
        };
        let ticket = screen.directory.begin_load();
        let task = screen.fetch(ticket, state);
        (screen, task)
    }

    fn fetch(&self, ticket: LoadTicket, state: &AppState) -> Task<ScreenMessage<Self>> {
        let Some(backend) = state.backend() else {
            return Task::done(ScreenMessage::ScreenMessage(SiteListMessage::Loaded(
                ticket,
                Err("Backend is not ready".to_string()),
            )));
        };
        let user = self.user.clone();
        Task::perform(
            async move {
                load_sites(&*backend, &user)
                    .await
                    .map_err(|err| err.to_string())
            },
            move |result| ScreenMessage::ScreenMessage(SiteListMessage::Loaded(ticket, result)),
        )
    }

    fn site_row(site: &Site) -> Element<'_, ScreenMessage<Self>> {
        let mut details = column![text(site.name.as_str()).size(17)].spacing(2);
        if let Some(job_number) = &site.job_number {
            details = details.push(text(format!("Job #{job_number}")).size(13));
        }
        if let Some(address) = &site.address {
            details = details.push(text(address.as_str()).size(12));
        }
        button(details)
            .style(button::text)
            .width(Length::Fill)
            .padding([12, 16])
            .on_press(ScreenMessage::ScreenMessage(SiteListMessage::Open(site.clone())))
            .into()
    }
}

impl Screen for SiteListScreen {
    type Message = SiteListMessage;
    type ParentMessage = SiteListParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let msg = ScreenMessage::ScreenMessage;
        let refresh_label = if self.directory.is_refreshing() {
            "Refreshing..."
        } else {
            "Refresh"
        };
        let search_label = if self.directory.search_visible() {
            "Done"
        } else {
            "Search"
        };
        let bar = top_bar(
            None,
            "Job Sites",
            Some(self.user.email.as_str()),
            vec![
                button(search_label)
                    .style(button::secondary)
                    .on_press(msg(SiteListMessage::ToggleSearch))
                    .into(),
                button(refresh_label)
                    .style(button::secondary)
                    .on_press_maybe(
                        (!self.directory.is_refreshing()).then_some(msg(SiteListMessage::Refresh)),
                    )
                    .into(),
                button("Sign out")
                    .style(button::danger)
                    .on_press_maybe((!self.signing_out).then_some(msg(SiteListMessage::SignOut)))
                    .into(),
            ],
        );

        let mut page = column![bar];
        if self.directory.search_visible() {
            page = page.push(
                container(
                    text_input("Search by name or job number", self.directory.query())
                        .on_input(move |value| msg(SiteListMessage::QueryChanged(value)))
                        .padding(10),
                )
                .padding([8, 16]),
            );
        }
        if let DirectoryStatus::Failed(reason) = self.directory.status() {
            page = page.push(
                container(
                    column![
                        text(reason.as_str()).size(13),
                        button("Retry").on_press_maybe(
                            (!self.directory.is_loading()).then_some(msg(SiteListMessage::Load)),
                        ),
                    ]
                    .spacing(6),
                )
                .padding([8, 16]),
            );
        }

        let filtered = self.directory.filtered();
        let body: Element<'_, _> = if self.directory.is_loading() && self.directory.sites().is_empty()
        {
            empty_state("Loading sites...")
        } else if let Some(message) = self.directory.empty_message() {
            empty_state(message)
        } else {
            let last = filtered.len().saturating_sub(1);
            let mut list = column![];
            for (index, site) in filtered.into_iter().enumerate() {
                list = list.push(Self::site_row(site));
                if index < last {
                    list = list.push(divider());
                }
            }
            scrollable(list).height(Length::Fill).into()
        };
        page.push(body).into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            SiteListMessage::Load => {
                let ticket = self.directory.begin_load();
                self.fetch(ticket, state)
            }
            SiteListMessage::Refresh => {
                let ticket = self.directory.begin_refresh();
                self.fetch(ticket, state)
            }
            SiteListMessage::Loaded(ticket, result) => {
                self.directory.finish(ticket, result);
                Task::none()
            }
            SiteListMessage::QueryChanged(query) => {
                self.directory.set_query(query);
                Task::none()
            }
            SiteListMessage::ToggleSearch => {
                self.directory.toggle_search();
                Task::none()
            }
            SiteListMessage::Open(site) => {
                Task::done(ScreenMessage::ParentMessage(SiteListParentMessage::OpenSite(site)))
            }
            SiteListMessage::SignOut => {
                let Some(backend) = state.backend() else {
                    return Task::none();
                };
                self.signing_out = true;
                Task::perform(
                    async move { backend.sign_out().await.map_err(|err| format!("{err:#}")) },
                    |result| ScreenMessage::ScreenMessage(SiteListMessage::SignedOut(result)),
                )
            }
            SiteListMessage::SignedOut(result) => {
                self.signing_out = false;
                if let Err(reason) = result {
                    tracing::warn!("sign out failed: {reason}");
                }
                Task::none()
            }
        }
    }
}
