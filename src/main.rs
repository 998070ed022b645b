use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, row, text, Column};
use iced::{keyboard, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod blueprint;
mod error;
mod state;
mod ui;

use blueprint::import::FolderScan;
use blueprint::{import, loader, publish, Compositor};
use state::data::{ImagePayload, ViewSlot};
use state::gallery::{gallery_sequence, GalleryEntry, GalleryItem, ZoomCursor};
use state::render::{render_request, RenderState};
use state::session::{Applied, CombinedArtifact, Epoch, Session};
use state::settings::BlueprintSettings;

/// Image types offered in the file pickers
const PICKER_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// Main application state
struct BlueprintStudio {
    session: Session,
    compositor: Compositor,
    zoom: ZoomCursor,
    render: RenderState,
    /// Texture handles for everything currently in the gallery
    handles: ui::Handles,
    /// Status message to display to the user
    status: String,
    /// Last error, shown as a banner until dismissed
    error: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    PickSource,
    SourceLoaded(Result<ImagePayload, String>),
    PickStyledSource,
    StyledLoaded(Result<ImagePayload, String>),
    PickView(ViewSlot),
    ViewLoaded {
        epoch: Epoch,
        slot: ViewSlot,
        result: Result<ImagePayload, String>,
    },
    ImportFolder,
    FolderScanned {
        epoch: Epoch,
        result: Result<FolderScan, String>,
    },
    ClearViews,
    CombinedReady {
        inputs: blake3::Hash,
        result: Result<CombinedArtifact, String>,
    },
    Zoom(ImagePayload),
    ZoomNext,
    ZoomPrev,
    ZoomClose,
    Download(GalleryEntry),
    Saved(Result<PathBuf, String>),
    ExportAll,
    Exported(Result<Vec<PathBuf>, String>),
    DismissError,
}

impl BlueprintStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = BlueprintSettings::load_or_default();
        tracing::info!(
            canvas = settings.canvas_size,
            tile = settings.tile_size(),
            "🎨 Blueprint Studio initialized"
        );

        (
            BlueprintStudio {
                session: Session::new(),
                compositor: Compositor::new(settings),
                zoom: ZoomCursor::Closed,
                render: RenderState::Idle,
                handles: ui::Handles::new(),
                status: "Ready. Open a source image or import a folder of views.".to_string(),
                error: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickSource => {
                let Some(path) = pick_image("Select Source Image") else {
                    return Task::none();
                };
                self.status = format!("Loading {}...", path.display());
                Task::perform(loader::load_image_file(path), |result| {
                    Message::SourceLoaded(result.map_err(|e| e.to_string()))
                })
            }
            Message::SourceLoaded(Ok(payload)) => {
                let epoch = self.session.set_source_image(Some(payload));
                tracing::info!(%epoch, "new source image, batch started");
                self.status = "Source loaded. Load or import the five views.".to_string();
                self.error = None;
                self.refresh()
            }
            Message::PickStyledSource => {
                let Some(path) = pick_image("Select Styled Source Image") else {
                    return Task::none();
                };
                Task::perform(loader::load_image_file(path), |result| {
                    Message::StyledLoaded(result.map_err(|e| e.to_string()))
                })
            }
            Message::StyledLoaded(Ok(payload)) => {
                self.session.set_styled_source(Some(payload));
                self.status = "Styled source loaded.".to_string();
                self.refresh()
            }
            Message::SourceLoaded(Err(e)) | Message::StyledLoaded(Err(e)) => self.fail(e),

            Message::PickView(slot) => {
                let Some(path) = pick_image(&format!("Select {}", slot.title())) else {
                    return Task::none();
                };
                let epoch = self.session.epoch();
                self.status = format!("Loading {}...", slot.title());
                load_view(epoch, slot, path)
            }
            Message::ViewLoaded {
                epoch,
                slot,
                result,
            } => match result {
                Ok(payload) => {
                    if self.session.set_view(epoch, slot, Some(payload)) == Applied::Stale {
                        return Task::none();
                    }
                    let present = self.session.snapshot().present_count();
                    tracing::info!(%slot, present, "view loaded");
                    self.status = format!("{} loaded ({}/5 views).", slot.title(), present);
                    self.refresh()
                }
                // Failures from an abandoned batch are not worth a banner
                Err(e) if epoch == self.session.epoch() => {
                    self.fail(format!("{}: {}", slot.title(), e))
                }
                Err(_) => Task::none(),
            },

            Message::ImportFolder => {
                let Some(folder) = FileDialog::new()
                    .set_title("Select Folder with View Images")
                    .pick_folder()
                else {
                    return Task::none();
                };

                let epoch = self.session.reset_views();
                self.status = format!("Importing views from {}...", folder.display());
                self.error = None;

                let refresh = self.refresh();
                let scan = Task::perform(import::scan_view_folder(folder), move |result| {
                    Message::FolderScanned {
                        epoch,
                        result: result.map_err(|e| e.to_string()),
                    }
                });
                Task::batch([refresh, scan])
            }
            Message::FolderScanned { epoch, result } => {
                if epoch != self.session.epoch() {
                    tracing::debug!(%epoch, "ignoring scan for an old batch");
                    return Task::none();
                }
                match result {
                    Ok(scan) if scan.matches.is_empty() => {
                        self.fail("No view images found (expected names like front.png, top_view.png)")
                    }
                    Ok(scan) => {
                        self.status = format!(
                            "Loading {} views ({} duplicates ignored)...",
                            scan.matches.len(),
                            scan.skipped
                        );
                        // One independent load per slot; each lands on its own
                        Task::batch(
                            scan.matches
                                .into_iter()
                                .map(|(slot, path)| load_view(epoch, slot, path)),
                        )
                    }
                    Err(e) => self.fail(e),
                }
            }
            Message::ClearViews => {
                self.session.reset_views();
                self.status = "Views cleared.".to_string();
                self.refresh()
            }

            Message::CombinedReady { inputs, result } => {
                self.render.finish(inputs);
                match result {
                    Ok(artifact) => {
                        let rendered_at = artifact.rendered_at;
                        if self.session.accept_combined(artifact) == Applied::Accepted {
                            self.status = format!(
                                "Combined blueprint rendered at {}.",
                                rendered_at.format("%H:%M:%S")
                            );
                        }
                        self.refresh()
                    }
                    Err(e) => {
                        // Only report failures for the views on screen
                        if self.session.snapshot().digest() != inputs {
                            return Task::none();
                        }
                        self.render = RenderState::Failed {
                            inputs,
                            epoch: self.session.epoch(),
                        };
                        self.session.clear_combined();
                        let task = self.fail(format!("Combined blueprint failed: {}", e));
                        let sequence = gallery_sequence(&self.session);
                        self.zoom.revalidate(sequence.len());
                        task
                    }
                }
            }

            Message::Zoom(payload) => {
                let sequence = gallery_sequence(&self.session);
                if !self.zoom.open(&sequence, &payload) {
                    tracing::debug!("zoom target is no longer in the gallery");
                }
                Task::none()
            }
            Message::ZoomNext => {
                let len = gallery_sequence(&self.session).len();
                self.zoom.next(len);
                Task::none()
            }
            Message::ZoomPrev => {
                self.zoom.prev();
                Task::none()
            }
            Message::ZoomClose => {
                self.zoom.close();
                Task::none()
            }

            Message::Download(entry) => {
                let Some(item) = gallery_sequence(&self.session)
                    .into_iter()
                    .find(|item| item.entry == entry)
                else {
                    return Task::none();
                };
                let Some(path) = FileDialog::new()
                    .set_title("Save Image")
                    .set_file_name(entry.download_filename())
                    .add_filter("PNG image", &["png"])
                    .save_file()
                else {
                    return Task::none();
                };
                Task::perform(publish::save_png(path, item.payload), |result| {
                    Message::Saved(result.map_err(|e| e.to_string()))
                })
            }
            Message::Saved(Ok(path)) => {
                self.status = format!("✅ Saved {}", path.display());
                Task::none()
            }
            Message::ExportAll => {
                let items = gallery_sequence(&self.session);
                if items.is_empty() {
                    return Task::none();
                }
                let Some(folder) = FileDialog::new()
                    .set_title("Export Blueprint Images")
                    .pick_folder()
                else {
                    return Task::none();
                };
                self.status = format!("Exporting {} images...", items.len());
                Task::perform(publish::export_all(folder, items), |result| {
                    Message::Exported(result.map_err(|e| e.to_string()))
                })
            }
            Message::Exported(Ok(paths)) => {
                self.status = format!("✅ Exported {} images.", paths.len());
                Task::none()
            }
            Message::Saved(Err(e)) | Message::Exported(Err(e)) => self.fail(e),

            Message::DismissError => {
                self.error = None;
                Task::none()
            }
        }
    }

    /// Re-derive everything that depends on the session after a mutation
    fn refresh(&mut self) -> Task<Message> {
        let sequence = gallery_sequence(&self.session);
        self.zoom.revalidate(sequence.len());
        self.sync_handles(&sequence);
        self.schedule_render()
    }

    /// Start a composite when the views are complete and not yet rendered
    fn schedule_render(&mut self) -> Task<Message> {
        let Some((set, inputs)) = render_request(&self.session, self.render) else {
            return Task::none();
        };

        tracing::info!(epoch = %self.session.epoch(), "all five views present, composing");
        self.render = RenderState::Rendering(inputs);
        self.status = "Rendering combined blueprint...".to_string();

        let compositor = self.compositor;
        Task::perform(async move { compositor.compose(set).await }, move |result| {
            Message::CombinedReady {
                inputs,
                result: result.map_err(|e| e.to_string()),
            }
        })
    }

    /// Keep one texture handle per gallery image, drop the rest
    fn sync_handles(&mut self, sequence: &[GalleryItem]) {
        self.handles.retain(|digest, _| {
            sequence
                .iter()
                .any(|item| item.payload.digest() == *digest)
        });
        for item in sequence {
            self.handles
                .entry(item.payload.digest())
                .or_insert_with(|| Handle::from_bytes(item.payload.bytes().to_vec()));
        }
    }

    fn fail(&mut self, error: impl Into<String>) -> Task<Message> {
        let error = error.into();
        tracing::warn!("⚠️  {}", error);
        self.error = Some(error);
        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let sequence = gallery_sequence(&self.session);
        let has_upload = self.session.source().uploaded.is_some();
        let present = self.session.snapshot().present_count();
        let settings = self.compositor.settings();

        let view_buttons = ViewSlot::DISPLAY_ORDER.into_iter().fold(
            Column::new().spacing(8),
            |buttons, slot| {
                buttons.push(
                    button(text(format!("Load {}", slot.title())))
                        .on_press(Message::PickView(slot))
                        .width(Length::Fill),
                )
            },
        );

        let controls = column![
            text("Blueprint Studio").size(32),
            text("1. Source").size(20),
            button("Open Source Image")
                .on_press(Message::PickSource)
                .padding(10)
                .width(Length::Fill),
            button("Open Styled Source")
                .on_press_maybe(has_upload.then_some(Message::PickStyledSource))
                .padding(10)
                .width(Length::Fill),
            text("2. Views").size(20),
            button("Import Views from Folder")
                .on_press(Message::ImportFolder)
                .padding(10)
                .width(Length::Fill),
            view_buttons,
            button("Clear Views")
                .on_press_maybe((present > 0).then_some(Message::ClearViews))
                .padding(10)
                .width(Length::Fill),
            text("3. Export").size(20),
            button("Export All")
                .on_press_maybe((!sequence.is_empty()).then_some(Message::ExportAll))
                .padding(10)
                .width(Length::Fill),
            text(&self.status).size(14),
            text(format!(
                "Sheet {0}x{0}px, {1}px tiles",
                settings.canvas_size,
                settings.tile_size()
            ))
            .size(12),
        ]
        .spacing(12)
        .padding(24)
        .width(Length::Fixed(300.0));

        let rendering = self.render.is_rendering();
        let results = ui::gallery::results(&self.session, &self.handles, rendering);

        let results = match &self.error {
            Some(error) => column![error_banner(error), results].into(),
            None => results,
        };

        let base: Element<Message> = row![controls, results]
            .width(Length::Fill)
            .height(Length::Fill)
            .into();

        let zoomed = self.zoom.index().and_then(|index| {
            let item = sequence.get(index)?;
            let handle = self.handles.get(&item.payload.digest())?;
            Some(ui::zoom::ZoomView {
                handle: handle.clone(),
                title: match item.entry {
                    GalleryEntry::Source => self.session.source().title(),
                    entry => entry.title(),
                },
                position: index,
                len: sequence.len(),
                has_prev: self.zoom.has_prev(),
                has_next: self.zoom.has_next(sequence.len()),
            })
        });

        match zoomed {
            Some(zoom) => ui::zoom::overlay(base, zoom),
            None => base,
        }
    }

    /// Escape and the arrow keys drive the zoom viewer while it is open
    fn subscription(&self) -> Subscription<Message> {
        if self.zoom.index().is_none() {
            return Subscription::none();
        }

        keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::ZoomClose),
            keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => Some(Message::ZoomPrev),
            keyboard::Key::Named(keyboard::key::Named::ArrowRight) => Some(Message::ZoomNext),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn error_banner(error: &str) -> Element<'_, Message> {
    container(
        row![
            text(error).size(14),
            horizontal_space(),
            button(text("Dismiss").size(14))
                .style(button::text)
                .on_press(Message::DismissError),
        ]
        .spacing(12),
    )
    .padding(12)
    .width(Length::Fill)
    .style(|theme: &Theme| {
        let danger = theme.extended_palette().danger.weak;
        container::Style {
            background: Some(danger.color.into()),
            text_color: Some(danger.text),
            ..container::Style::default()
        }
    })
    .into()
}

/// Show the native image picker
fn pick_image(title: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .add_filter("Images", &PICKER_EXTENSIONS)
        .pick_file()
}

/// Load one view file in the background, tagged with the batch it belongs to
fn load_view(epoch: Epoch, slot: ViewSlot, path: PathBuf) -> Task<Message> {
    Task::perform(loader::load_image_file(path), move |result| Message::ViewLoaded {
        epoch,
        slot,
        result: result.map_err(|e| e.to_string()),
    })
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application(
        "Blueprint Studio",
        BlueprintStudio::update,
        BlueprintStudio::view,
    )
    .theme(BlueprintStudio::theme)
    .subscription(BlueprintStudio::subscription)
    .centered()
    .run_with(BlueprintStudio::new)
}
