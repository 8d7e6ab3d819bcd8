use iced::{
    Alignment::Center,
    Color, Element, Length, Theme, border,
    widget::{Container, button, column, container, container::Style, row, text},
};
use iced_widget::container::bordered_box;

use crate::core::{geometry::GridGeometry, plans::Plan};

pub const BAR_PADDING: u16 = 12;

/// Header row: leading control, title block, trailing controls.
pub fn top_bar<'a, Message: 'a>(
    leading: Option<Element<'a, Message>>,
    title: &'a str,
    subtitle: Option<&'a str>,
    trailing: Vec<Element<'a, Message>>,
) -> Element<'a, Message> {
    let mut heading = column![text(title).size(20)];
    if let Some(subtitle) = subtitle {
        heading = heading.push(text(subtitle).size(13));
    }

    let mut bar = row![].spacing(12).align_y(Center);
    if let Some(leading) = leading {
        bar = bar.push(leading);
    }
    bar = bar.push(container(heading).width(Length::Fill));
    for control in trailing {
        bar = bar.push(control);
    }

    container(bar)
        .padding(BAR_PADDING)
        .width(Length::Fill)
        .style(bordered_box)
        .into()
}

pub fn divider<'a, Message: 'a>() -> Element<'a, Message> {
    container(column![])
        .width(Length::Fill)
        .height(Length::Fixed(1.0))
        .style(|theme: &Theme| {
            Style::default().background(theme.extended_palette().background.strong.color)
        })
        .into()
}

/// Tap-to-close backdrop behind the drawer. Fades with the drawer.
pub fn scrim_style(progress: f32) -> impl Fn(&Theme) -> Style {
    move |_theme: &Theme| Style::default().background(Color::from_rgba(0.0, 0.0, 0.0, 0.4 * progress))
}

pub fn panel_style(theme: &Theme) -> Style {
    bordered_box(theme)
        .background(theme.palette().background)
        .border(border::width(1).color(theme.extended_palette().background.strong.color))
}

fn card_frame<'a, Message: 'a>(content: impl Into<Element<'a, Message>>) -> Container<'a, Message> {
    container(content).padding(6).style(bordered_box)
}

pub fn plan_card<'a, Message: Clone + 'a>(
    plan: &'a Plan,
    geometry: &GridGeometry,
    on_press: Message,
) -> Element<'a, Message> {
    let thumbnail = container(text(plan.sheet_number.as_str()).size(22))
        .width(Length::Fill)
        .height(Length::Fixed(geometry.thumbnail_height))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(geometry.thumbnail_height))
        .style(|theme: &Theme| {
            Style::default().background(theme.extended_palette().background.weak.color)
        });

    let caption = column![
        text(plan.sheet_number.as_str()).size(15),
        text(plan.title.as_str()).size(12),
        text(format!("{} | {}", plan.version, plan.version_date)).size(11),
    ]
    .spacing(2);

    button(card_frame(column![thumbnail, caption].spacing(6)))
        .style(button::text)
        .padding(0)
        .width(Length::Fixed(geometry.card_width))
        .on_press(on_press)
        .into()
}

/// Empty cell keeping the last card of an odd row at card width.
pub fn placeholder_card<'a, Message: 'a>(geometry: &GridGeometry) -> Element<'a, Message> {
    container(column![])
        .width(Length::Fixed(geometry.card_width))
        .into()
}

pub fn plan_row<'a, Message: Clone + 'a>(plan: &'a Plan, on_press: Message) -> Element<'a, Message> {
    let tags = plan.tags.join(", ");
    let details = column![
        text(plan.title.as_str()).size(14),
        text(format!("{} | {} {}", plan.version, plan.version_date, tags)).size(11),
    ]
    .spacing(2);

    button(
        row![
            container(text(plan.sheet_number.as_str()).size(15)).width(Length::Fixed(64.0)),
            details,
        ]
        .spacing(12)
        .align_y(Center),
    )
    .style(button::text)
    .width(Length::Fill)
    .padding([10, 16])
    .on_press(on_press)
    .into()
}

pub fn folder_header<'a, Message: Clone + 'a>(
    label: &'a str,
    count: usize,
    collapsed: bool,
    on_press: Message,
) -> Element<'a, Message> {
    let marker = if collapsed { "+" } else { "-" };
    button(
        row![
            text(marker).size(16),
            container(text(label).size(16)).width(Length::Fill),
            text(count.to_string()).size(13),
        ]
        .spacing(10)
        .align_y(Center),
    )
    .style(button::secondary)
    .width(Length::Fill)
    .padding([8, 16])
    .on_press(on_press)
    .into()
}

pub fn empty_state<'a, Message: 'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).size(16))
        .padding(40)
        .center_x(Length::Fill)
        .into()
}
