/// Zoom viewer overlay
///
/// Darkens the window and shows one gallery image at a time with
/// previous/next buttons. Clicking the backdrop closes the viewer.
/// Keyboard handling (Escape, arrows) lives in the app subscription.
use iced::widget::image::Handle;
use iced::widget::{
    button, center, column, container, horizontal_space, image, mouse_area, opaque, row, stack,
    text,
};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::Message;

/// Everything the overlay needs to draw the current image
#[derive(Debug, Clone)]
pub struct ZoomView {
    pub handle: Handle,
    pub title: &'static str,
    pub position: usize,
    pub len: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

pub fn overlay<'a>(base: Element<'a, Message>, zoom: ZoomView) -> Element<'a, Message> {
    let prev = button(text("‹").size(40))
        .padding([4, 16])
        .style(button::secondary)
        .on_press_maybe(zoom.has_prev.then_some(Message::ZoomPrev));
    let next = button(text("›").size(40))
        .padding([4, 16])
        .style(button::secondary)
        .on_press_maybe(zoom.has_next.then_some(Message::ZoomNext));

    let header = row![
        horizontal_space(),
        text(format!("{}  ({}/{})", zoom.title, zoom.position + 1, zoom.len)).size(18),
        horizontal_space(),
        button(text("×").size(32))
            .style(button::text)
            .on_press(Message::ZoomClose),
    ]
    .align_y(Alignment::Center);

    let picture = image(zoom.handle)
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Contain);

    let content = column![
        header,
        row![prev, picture, next]
            .spacing(16)
            .align_y(Alignment::Center)
            .height(Length::Fill),
    ]
    .spacing(12)
    .max_width(1024);

    let backdrop = center(opaque(content))
        .padding(32)
        .style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.8,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        });

    stack![base, opaque(mouse_area(backdrop).on_press(Message::ZoomClose))].into()
}
