use iced::widget::{button, center, column, container, image, mouse_area, scrollable, text, Column};
use iced::{mouse, Alignment, ContentFit, Element, Length, Pixels};
use iced_aw::Wrap;

use super::Handles;
use crate::state::data::{ImagePayload, ViewSlot};
use crate::state::gallery::GalleryEntry;
use crate::state::session::Session;
use crate::Message;

/// Edge length of a view thumbnail
const CELL: f32 = 180.0;

/// Edge length of the combined sheet preview
const SHEET: f32 = 384.0;

/// Right-hand results area: source, five views, combined sheet
pub fn results<'a>(session: &'a Session, handles: &'a Handles, rendering: bool) -> Element<'a, Message> {
    let source = session.source();
    let source_cell = image_cell(
        source.title(),
        source.display(),
        handles,
        GalleryEntry::Source,
        "Open an image to start",
        CELL,
    );

    let views: Vec<Element<'a, Message>> = ViewSlot::DISPLAY_ORDER
        .into_iter()
        .map(|slot| {
            image_cell(
                slot.title(),
                session.snapshot().get(slot),
                handles,
                GalleryEntry::View(slot),
                "Not generated",
                CELL,
            )
        })
        .collect();

    let mut content: Column<'a, Message> = column![
        text("Source").size(22),
        source_cell,
        text("Blueprint Views").size(22),
        Wrap::with_elements(views)
            .spacing(Pixels(16.0))
            .line_spacing(Pixels(16.0)),
    ]
    .spacing(16);

    // The sheet only exists once every view is present
    if session.snapshot().is_complete() {
        let placeholder = if rendering {
            "Rendering..."
        } else {
            "Not available"
        };
        content = content.push(text("Combined Blueprint").size(22)).push(image_cell(
            "Combined Blueprint",
            session.combined().map(|artifact| &artifact.payload),
            handles,
            GalleryEntry::Combined,
            placeholder,
            SHEET,
        ));
    }

    scrollable(content.padding(24).width(Length::Fill))
        .height(Length::Fill)
        .into()
}

/// Titled image frame with a download button; click to zoom
fn image_cell<'a>(
    title: &'static str,
    payload: Option<&'a ImagePayload>,
    handles: &'a Handles,
    entry: GalleryEntry,
    placeholder: &'static str,
    size: f32,
) -> Element<'a, Message> {
    let handle = payload.and_then(|payload| handles.get(&payload.digest()));

    let body: Element<'a, Message> = match (payload, handle) {
        (Some(payload), Some(handle)) => mouse_area(
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain),
        )
        .on_press(Message::Zoom(payload.clone()))
        .interaction(mouse::Interaction::Pointer)
        .into(),
        _ => center(text(placeholder).size(14)).into(),
    };

    let frame = container(body)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .padding(4)
        .style(container::bordered_box);

    let download = payload.map(|_| {
        button(text("Download").size(14))
            .on_press(Message::Download(entry))
            .width(Length::Fixed(size))
    });

    column![text(title).size(16), frame]
        .push_maybe(download)
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
}
