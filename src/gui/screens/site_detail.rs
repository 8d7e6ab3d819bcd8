use std::time::Duration;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    time::Instant,
    widget::{button, column, container, mouse_area, row, scrollable, stack, text, text_input},
};

use crate::{
    core::{
        db::Site,
        drawer::{Drawer, MenuSection},
        geometry::{GRID_GAP, GRID_PADDING, GridGeometry},
        plans::{
            self, CollapseToggle, GRID_COLUMNS, GridCell, PlanBrowser, PlanGroup, ViewMode,
            list_rows, pack_grid,
        },
    },
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{
            divider, empty_state, folder_header, panel_style, placeholder_card, plan_card,
            plan_row, scrim_style, top_bar,
        },
    },
};

#[derive(Debug, Clone)]
pub struct SiteDetailScreen {
    site: Site,
    drawer: Drawer,
    browser: PlanBrowser,
    collapse: CollapseToggle,
    geometry: GridGeometry,
    clock: FrameClock,
}

/// Time between animation frames.
#[derive(Debug, Clone, Default)]
struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Elapsed time since the previous frame, zero for the first one.
    fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        elapsed
    }

    fn stop(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone)]
pub enum SiteDetailMessage {
    OpenDrawer,
    CloseDrawer,
    Select(MenuSection),
    ToggleGroup,
    Home,
    QueryChanged(String),
    ClearQuery,
    ToggleView,
    CollapseAll,
    ToggleFolder(String),
    OpenPlan(String),
}

#[derive(Debug, Clone)]
pub enum SiteDetailParentMessage {
    Home,
}

type Msg = ScreenMessage<SiteDetailScreen>;

fn msg(message: SiteDetailMessage) -> Msg {
    ScreenMessage::ScreenMessage(message)
}

impl SiteDetailScreen {
    pub fn new(site: Site, state: &AppState) -> Self {
        let catalog = plans::bundled();
        if let Err(err) = catalog.validate() {
            tracing::warn!("plan catalog is inconsistent: {err:#}");
        }
        Self {
            site,
            drawer: Drawer::new(state.drawer_width()),
            browser: PlanBrowser::new(catalog),
            collapse: CollapseToggle::default(),
            geometry: state.geometry(),
            clock: FrameClock::default(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.drawer.is_animating()
    }

    pub fn on_frame(&mut self, now: Instant) {
        let elapsed = self.clock.tick(now);
        if self.drawer.tick(elapsed).is_some() {
            self.clock.stop();
        }
    }

    /// Forward an open/close request. A retarget mid-slide keeps the running
    /// clock so the next frame still accounts for the time since the last one.
    fn drive(&mut self, request: impl FnOnce(&mut Drawer)) {
        if !self.drawer.is_animating() {
            self.clock.stop();
        }
        request(&mut self.drawer);
    }

    pub fn on_resize(&mut self, geometry: GridGeometry, drawer_width: f32) {
        self.geometry = geometry;
        self.drawer.set_width(drawer_width);
    }

    fn top_bar(&self) -> Element<'_, Msg> {
        let menu = button("Menu")
            .style(button::secondary)
            .on_press(msg(SiteDetailMessage::OpenDrawer));

        let mut trailing: Vec<Element<'_, Msg>> = Vec::new();
        if self.drawer.active() == MenuSection::Plans {
            let view_label = match self.browser.view_mode() {
                ViewMode::Grid => "List",
                ViewMode::List => "Grid",
            };
            let collapse_label = if self.collapse.all_collapsed {
                "Expand all"
            } else {
                "Collapse all"
            };
            trailing.push(
                button(view_label)
                    .style(button::secondary)
                    .on_press(msg(SiteDetailMessage::ToggleView))
                    .into(),
            );
            trailing.push(
                button(collapse_label)
                    .style(button::secondary)
                    .on_press(msg(SiteDetailMessage::CollapseAll))
                    .into(),
            );
        }

        top_bar(
            Some(menu.into()),
            self.drawer.active_label(),
            Some(self.site.name.as_str()),
            trailing,
        )
    }

    fn group_body<'a>(&'a self, group: &PlanGroup<'a>) -> Element<'a, Msg> {
        match self.browser.view_mode() {
            ViewMode::Grid => {
                let mut grid = column![].spacing(GRID_GAP);
                for cells in pack_grid(&group.plans, GRID_COLUMNS) {
                    let mut line = row![].spacing(GRID_GAP);
                    for cell in cells {
                        line = line.push(match cell {
                            GridCell::Item(plan) => plan_card(
                                plan,
                                &self.geometry,
                                msg(SiteDetailMessage::OpenPlan(plan.id.clone())),
                            ),
                            GridCell::Placeholder => placeholder_card(&self.geometry),
                        });
                    }
                    grid = grid.push(line);
                }
                container(grid).padding([8.0, GRID_PADDING]).into()
            }
            ViewMode::List => {
                let mut list = column![];
                for entry in list_rows(&group.plans) {
                    list = list.push(plan_row(
                        entry.item,
                        msg(SiteDetailMessage::OpenPlan(entry.item.id.clone())),
                    ));
                    if entry.divider {
                        list = list.push(divider());
                    }
                }
                list.into()
            }
        }
    }

    fn plans_view(&self) -> Element<'_, Msg> {
        let mut search = row![
            text_input("Search sheet number or title", self.browser.query())
                .on_input(|value| msg(SiteDetailMessage::QueryChanged(value)))
                .padding(10)
        ]
        .spacing(8)
        .align_y(Center);
        if !self.browser.query().is_empty() {
            search = search.push(
                button("Clear")
                    .style(button::text)
                    .on_press(msg(SiteDetailMessage::ClearQuery)),
            );
        }

        let groups = self.browser.groups();
        let content: Element<'_, Msg> = if groups.is_empty() {
            empty_state("No plans match your search")
        } else {
            let mut sections = column![].spacing(4);
            for group in &groups {
                let collapsed = self.browser.is_collapsed(&group.key);
                sections = sections.push(folder_header(
                    self.group_label(group),
                    group.count(),
                    collapsed,
                    msg(SiteDetailMessage::ToggleFolder(group.key.clone())),
                ));
                if !collapsed {
                    sections = sections.push(self.group_body(group));
                }
            }
            scrollable(sections).height(Length::Fill).into()
        };

        column![container(search).padding([8.0, GRID_PADDING]), content].into()
    }

    /// Label borrowed from the catalog so it outlives the derived groups.
    fn group_label(&self, group: &PlanGroup<'_>) -> &str {
        self.browser
            .catalog()
            .folders
            .iter()
            .find(|folder| folder.id == group.key)
            .map_or(plans::UNFILED_LABEL, |folder| folder.name.as_str())
    }

    fn section_view(&self) -> Element<'_, Msg> {
        match self.drawer.active() {
            MenuSection::Plans => self.plans_view(),
            other => container(
                column![text(other.label()).size(22), text("Coming soon")]
                    .spacing(8)
                    .align_x(Center),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        }
    }

    fn menu_entry(&self, section: MenuSection, indent: f32) -> Element<'_, Msg> {
        let style = if self.drawer.active() == section {
            button::primary
        } else {
            button::text
        };
        button(text(section.label()))
            .style(style)
            .width(Length::Fill)
            .padding([10.0, 16.0 + indent])
            .on_press(msg(SiteDetailMessage::Select(section)))
            .into()
    }

    fn drawer_panel(&self) -> Element<'_, Msg> {
        let mut menu = column![
            button(text("Home"))
                .style(button::text)
                .width(Length::Fill)
                .padding([10, 16])
                .on_press(msg(SiteDetailMessage::Home)),
            divider(),
        ];
        for section in MenuSection::MAIN {
            menu = menu.push(self.menu_entry(section, 0.0));
        }
        let marker = if self.drawer.group_expanded() { "-" } else { "+" };
        menu = menu.push(
            button(row![
                container(text(MenuSection::GROUP_LABEL)).width(Length::Fill),
                text(marker),
            ])
            .style(button::text)
            .width(Length::Fill)
            .padding([10, 16])
            .on_press(msg(SiteDetailMessage::ToggleGroup)),
        );
        if self.drawer.group_expanded() {
            for section in MenuSection::PROJECT_MANAGEMENT {
                menu = menu.push(self.menu_entry(section, 16.0));
            }
        }

        // Slide by revealing the panel from its right edge.
        let visible = (self.drawer.width() + self.drawer.offset()).max(0.0);
        container(
            container(column![text(self.site.name.as_str()).size(18), menu].spacing(12))
                .padding([16, 0])
                .width(Length::Fixed(self.drawer.width()))
                .height(Length::Fill)
                .style(panel_style),
        )
        .width(Length::Fixed(visible))
        .height(Length::Fill)
        .align_right(Length::Fixed(visible))
        .clip(true)
        .into()
    }
}

impl Screen for SiteDetailScreen {
    type Message = SiteDetailMessage;
    type ParentMessage = SiteDetailParentMessage;

    fn view(&self) -> Element<'_, Msg> {
        let page = column![self.top_bar(), self.section_view()];
        if !self.drawer.is_visible() {
            return page.into();
        }
        let scrim = mouse_area(
            container(column![])
                .width(Length::Fill)
                .height(Length::Fill)
                .style(scrim_style(self.drawer.progress())),
        )
        .on_press(msg(SiteDetailMessage::CloseDrawer));

        stack![page, row![self.drawer_panel(), scrim]].into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<Msg> {
        match message {
            SiteDetailMessage::OpenDrawer => self.drive(Drawer::open),
            SiteDetailMessage::CloseDrawer => self.drive(Drawer::close),
            SiteDetailMessage::Select(section) => {
                self.drive(|drawer| drawer.select_section(section));
            }
            SiteDetailMessage::ToggleGroup => self.drawer.toggle_group(),
            SiteDetailMessage::Home => {
                self.drawer.go_home(&mut state.nav);
                return Task::done(ScreenMessage::ParentMessage(SiteDetailParentMessage::Home));
            }
            SiteDetailMessage::QueryChanged(query) => self.browser.set_query(query),
            SiteDetailMessage::ClearQuery => self.browser.clear_query(),
            SiteDetailMessage::ToggleView => self.browser.toggle_view_mode(),
            SiteDetailMessage::CollapseAll => {
                self.collapse.press();
                self.browser.sync_collapse(&self.collapse);
            }
            SiteDetailMessage::ToggleFolder(key) => self.browser.toggle_folder(&key),
            SiteDetailMessage::OpenPlan(id) => {
                tracing::info!(plan = %id, site = %self.site.id, "plan selected");
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::config::KioskConfig;

    fn screen() -> (SiteDetailScreen, AppState) {
        let state = AppState::new(KioskConfig::default(), 400.0);
        let site = Site {
            id: Uuid::new_v4(),
            name: "Harbor View".to_string(),
            job_number: None,
            address: None,
            status: None,
        };
        (SiteDetailScreen::new(site, &state), state)
    }

    #[test]
    fn retarget_keeps_frame_time() {
        let (mut screen, mut state) = screen();
        let start = Instant::now();

        let _ = screen.update(SiteDetailMessage::CloseDrawer, &mut state);
        screen.on_frame(start);
        screen.on_frame(start + Duration::from_millis(100));
        let midway = screen.drawer.progress();
        assert!(midway < 1.0);

        let _ = screen.update(SiteDetailMessage::OpenDrawer, &mut state);
        screen.on_frame(start + Duration::from_millis(116));
        assert!(screen.drawer.progress() > midway);
    }

    #[test]
    fn request_from_rest_starts_a_fresh_clock() {
        let (mut screen, mut state) = screen();
        let start = Instant::now();
        screen.clock.tick(start);

        let _ = screen.update(SiteDetailMessage::CloseDrawer, &mut state);
        screen.on_frame(start + Duration::from_secs(5));
        assert!(screen.drawer.is_animating());
        assert_eq!(screen.drawer.progress(), 1.0);
    }
}
