use iced::widget::{
    button, canvas, column, container, horizontal_space, image, pick_list, row, scrollable,
    slider, text, text_input,
};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

mod gemini;
mod photo;
mod prompt;
mod scene;
mod state;
mod ui;

use gemini::{AspectRatio, GeminiClient, GenerationError};
use photo::loader::{ReferencePhoto, UploadError};
use scene::rig::CameraRig;
use state::camera::CameraParams;
use state::status::AppStatus;

/// A generated rendering plus its display handle
#[derive(Debug, Clone)]
struct RenderedPerspective {
    png: Vec<u8>,
    handle: image::Handle,
}

impl RenderedPerspective {
    fn from_png(png: Vec<u8>) -> Self {
        Self {
            handle: image::Handle::from_bytes(png.clone()),
            png,
        }
    }
}

/// Main application state
struct Lens3d {
    /// The chosen viewpoint
    params: CameraParams,
    /// What the app is currently doing
    status: AppStatus,
    /// One-line status/feedback message shown at the bottom
    status_line: String,
    /// The loaded portrait, if any
    reference: Option<ReferencePhoto>,
    /// The latest generated render, replaced on each success
    output: Option<RenderedPerspective>,
    /// Optional free-text context appended to the instruction
    scene_notes: String,
    /// Requested output aspect ratio
    aspect: AspectRatio,
    /// Share button flashes "Copied!" while true
    share_copied: bool,
    /// Generation client; `None` when no API key is configured
    client: Option<GeminiClient>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User asked to pick a reference portrait
    PickReference,
    /// Background load of the reference finished
    ReferenceLoaded(Result<ReferencePhoto, UploadError>),
    AzimuthChanged(f32),
    ElevationChanged(f32),
    DistanceChanged(f32),
    NotesChanged(String),
    AspectChanged(AspectRatio),
    /// Restore the default viewpoint
    ResetView,
    /// User clicked "Generate Perspective"
    Generate,
    /// The generation round trip finished
    GenerationFinished(Result<RenderedPerspective, GenerationError>),
    /// User asked to save the current render
    SaveRender,
    RenderSaved(Result<PathBuf, String>),
    /// Copy the current camera description to the clipboard
    Share,
    /// Clear the "Copied!" feedback
    ShareAcknowledged,
}

impl Lens3d {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let client = match GeminiClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Generation disabled: {}", e);
                None
            }
        };

        let status_line = if client.is_some() {
            "Ready. Load a portrait to begin.".to_string()
        } else {
            format!(
                "Set {} to enable generation.",
                gemini::client::API_KEY_ENV
            )
        };

        (
            Lens3d {
                params: CameraParams::default(),
                status: AppStatus::default(),
                status_line,
                reference: None,
                output: None,
                scene_notes: String::new(),
                aspect: AspectRatio::default(),
                share_copied: false,
                client,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickReference => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Portrait")
                    .add_filter("Images", &["jpg", "jpeg", "png"])
                    .pick_file();

                if let Some(path) = file {
                    if !self.status.begin_upload() {
                        return Task::none();
                    }
                    self.status_line = format!("Loading {}...", path.display());

                    return Task::perform(
                        photo::loader::load_reference(path),
                        Message::ReferenceLoaded,
                    );
                }

                Task::none()
            }
            Message::ReferenceLoaded(Ok(reference)) => {
                self.status.finish_upload();
                self.status_line = format!(
                    "Loaded reference ({}x{}).",
                    reference.width, reference.height
                );
                self.reference = Some(reference);
                Task::none()
            }
            Message::ReferenceLoaded(Err(e)) => {
                self.status.fail();
                log::error!("Reference load failed: {}", e);
                self.status_line = format!("Could not load image: {}", e);
                Task::none()
            }
            Message::AzimuthChanged(azimuth) => {
                self.params = self.params.with_azimuth(azimuth);
                Task::none()
            }
            Message::ElevationChanged(elevation) => {
                self.params = self.params.with_elevation(elevation);
                Task::none()
            }
            Message::DistanceChanged(distance) => {
                self.params = self.params.with_distance(distance);
                Task::none()
            }
            Message::NotesChanged(notes) => {
                self.scene_notes = notes;
                Task::none()
            }
            Message::AspectChanged(aspect) => {
                self.aspect = aspect;
                Task::none()
            }
            Message::ResetView => {
                self.params.reset();
                Task::none()
            }
            Message::Generate => {
                let Some(reference) = &self.reference else {
                    return Task::none();
                };
                let Some(client) = self.client.clone() else {
                    self.status.fail();
                    self.status_line = format!(
                        "{} is not set; cannot generate.",
                        gemini::client::API_KEY_ENV
                    );
                    return Task::none();
                };
                if !self.status.begin_generation(true) {
                    return Task::none();
                }

                self.status_line = "Rendering scene...".to_string();
                let instruction = prompt::build_instruction(&self.params, &self.scene_notes);
                let reference_png = reference.png.clone();
                let aspect = self.aspect;

                Task::perform(
                    async move {
                        let bytes = client
                            .render_perspective(&reference_png, &instruction, aspect)
                            .await?;
                        Ok(RenderedPerspective::from_png(bytes))
                    },
                    Message::GenerationFinished,
                )
            }
            Message::GenerationFinished(Ok(render)) => {
                self.status.finish_generation();
                self.status_line = "Render complete.".to_string();
                self.output = Some(render);
                Task::none()
            }
            Message::GenerationFinished(Err(e)) => {
                self.status.fail();
                log::error!("Perspective generation failed: {}", e);
                // One coarse message covers every generation failure
                self.status_line =
                    "Generation failed. Check API credentials and quota.".to_string();
                Task::none()
            }
            Message::SaveRender => {
                let Some(render) = &self.output else {
                    return Task::none();
                };

                let file = FileDialog::new()
                    .set_title("Save Render")
                    .set_file_name(photo::export::default_file_name(self.params.azimuth))
                    .save_file();

                if let Some(path) = file {
                    return Task::perform(
                        photo::export::save_render(render.png.clone(), path),
                        Message::RenderSaved,
                    );
                }

                Task::none()
            }
            Message::RenderSaved(Ok(path)) => {
                self.status_line = format!("Saved {}.", path.display());
                Task::none()
            }
            Message::RenderSaved(Err(e)) => {
                log::error!("Export failed: {}", e);
                self.status_line = format!("Save failed: {}", e);
                Task::none()
            }
            Message::Share => {
                self.share_copied = true;
                let description = prompt::camera_description(&self.params);

                Task::batch([
                    iced::clipboard::write(description),
                    Task::perform(tokio::time::sleep(Duration::from_secs(2)), |_| {
                        Message::ShareAcknowledged
                    }),
                ])
            }
            Message::ShareAcknowledged => {
                self.share_copied = false;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let has_reference = self.reference.is_some();
        let ratio = self.reference.as_ref().map(|r| r.ratio()).unwrap_or(1.0);
        let rig = CameraRig::from_params(&self.params, ratio);

        let header = row![
            text("Lens 3D").size(28),
            horizontal_space(),
            button(text(if self.share_copied {
                "Copied!"
            } else {
                "Share View"
            }))
            .on_press(Message::Share)
            .padding(8),
            button("Reset View").on_press(Message::ResetView).padding(8),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let viewport = canvas(ui::viewport::Viewport::new(rig, has_reference))
            .width(Length::Fill)
            .height(Length::Fill);

        let caption = row![
            text(prompt::azimuth_label(self.params.azimuth)).size(13),
            text("|").size(13),
            text(prompt::elevation_label(self.params.elevation)).size(13),
            text("|").size(13),
            text(format!(
                "{} ({:.2}x)",
                prompt::zoom_label(self.params.distance),
                self.params.distance
            ))
            .size(13),
        ]
        .spacing(10);

        let stage = column![
            container(viewport).width(Length::Fill).height(Length::Fill),
            container(caption).center_x(Length::Fill),
        ]
        .spacing(8);

        let can_generate = self.status.can_generate(has_reference);
        let generate = button(
            text(if self.status.is_generating() {
                "Rendering Scene..."
            } else {
                "Generate Perspective"
            })
            .size(14),
        )
        .on_press_maybe(can_generate.then_some(Message::Generate))
        .padding(14)
        .width(Length::Fill);

        let upload: Element<Message> = match &self.reference {
            Some(reference) => column![
                image(reference.handle.clone()).height(Length::Fixed(160.0)),
                button("Change Image").on_press(Message::PickReference),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .into(),
            None => column![
                text("JPG/PNG portrait").size(12),
                button("Upload Portrait")
                    .on_press(Message::PickReference)
                    .padding(10),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .into(),
        };

        let panel = column![
            parameter_control(
                "Azimuth (Rotate)",
                format!("{:.0}°", self.params.azimuth),
                slider(0.0..=360.0, self.params.azimuth, Message::AzimuthChanged).step(1.0),
            ),
            parameter_control(
                "Elevation (Angle)",
                format!("{:.0}°", self.params.elevation),
                slider(
                    state::camera::ELEVATION_MIN..=state::camera::ELEVATION_MAX,
                    self.params.elevation,
                    Message::ElevationChanged,
                )
                .step(1.0),
            ),
            parameter_control(
                "Zoom (Distance)",
                format!("{:.2}x", self.params.distance),
                slider(
                    state::camera::DISTANCE_MIN..=state::camera::DISTANCE_MAX,
                    self.params.distance,
                    Message::DistanceChanged,
                )
                .step(0.01),
            ),
            text_input("Scene notes (optional)", &self.scene_notes)
                .on_input(Message::NotesChanged)
                .padding(8),
            row![
                text("Output aspect").size(12),
                horizontal_space(),
                pick_list(AspectRatio::ALL, Some(self.aspect), Message::AspectChanged),
            ]
            .align_y(Alignment::Center),
            generate,
            container(upload).center_x(Length::Fill),
        ]
        .spacing(16)
        .width(Length::Fixed(320.0));

        let output_section = self.output.as_ref().map(|render| {
            column![
                row![
                    text("Render complete").size(13),
                    horizontal_space(),
                    button("Save to Disk").on_press(Message::SaveRender).padding(8),
                ]
                .align_y(Alignment::Center),
                container(image(render.handle.clone()).height(Length::Fixed(360.0)))
                    .center_x(Length::Fill),
            ]
            .spacing(10)
        });

        let content = column![
            header,
            row![stage, panel].spacing(16).height(Length::Fixed(540.0)),
        ]
        .push_maybe(output_section)
        .push(text(&self.status_line).size(14))
        .spacing(16)
        .padding(20);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// A labeled slider with its live value readout
fn parameter_control<'a>(
    label: &'a str,
    value: String,
    control: iced::widget::Slider<'a, f32, Message>,
) -> Element<'a, Message> {
    column![
        row![text(label).size(12), horizontal_space(), text(value).size(12)],
        control,
    ]
    .spacing(6)
    .into()
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Lens 3D", Lens3d::update, Lens3d::view)
        .theme(Lens3d::theme)
        .centered()
        .run_with(Lens3d::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_photo(width: u32, height: u32) -> ReferencePhoto {
        ReferencePhoto {
            png: vec![1, 2, 3],
            width,
            height,
            handle: image::Handle::from_bytes(vec![1, 2, 3]),
        }
    }

    fn test_app() -> Lens3d {
        Lens3d {
            params: CameraParams::default(),
            status: AppStatus::default(),
            status_line: String::new(),
            reference: None,
            output: None,
            scene_notes: String::new(),
            aspect: AspectRatio::default(),
            share_copied: false,
            client: Some(GeminiClient::new("test-key")),
        }
    }

    #[test]
    fn test_generation_round_trip() {
        let mut app = test_app();

        // Load a 4:3 reference
        let _ = app.update(Message::ReferenceLoaded(Ok(test_photo(400, 300))));
        assert_eq!(app.status, AppStatus::Idle);
        let ratio = app.reference.as_ref().unwrap().ratio();
        assert!((ratio - 4.0 / 3.0).abs() < 0.01);

        // Choose the viewpoint
        let _ = app.update(Message::AzimuthChanged(90.0));
        let _ = app.update(Message::ElevationChanged(20.0));
        let _ = app.update(Message::DistanceChanged(1.2));
        assert_eq!(
            app.params,
            CameraParams {
                azimuth: 90.0,
                elevation: 20.0,
                distance: 1.2,
            }
        );

        // Kick off generation; the request task itself is not polled here
        let _ = app.update(Message::Generate);
        assert_eq!(app.status, AppStatus::Generating);
        assert!(!app.status.can_generate(true));

        // Deliver a mock success carrying one PNG payload
        let payload = vec![0x89, b'P', b'N', b'G'];
        let _ = app.update(Message::GenerationFinished(Ok(
            RenderedPerspective::from_png(payload.clone()),
        )));
        assert_eq!(app.status, AppStatus::Idle);
        assert_eq!(app.output.as_ref().unwrap().png, payload);
    }

    #[test]
    fn test_generation_failure_keeps_previous_output() {
        let mut app = test_app();
        let _ = app.update(Message::ReferenceLoaded(Ok(test_photo(200, 200))));

        let _ = app.update(Message::Generate);
        let _ = app.update(Message::GenerationFinished(Ok(
            RenderedPerspective::from_png(vec![7]),
        )));

        let _ = app.update(Message::Generate);
        let _ = app.update(Message::GenerationFinished(Err(GenerationError::NoImage)));

        assert_eq!(app.status, AppStatus::Error);
        // The previous render stays displayed
        assert_eq!(app.output.as_ref().unwrap().png, vec![7]);
    }

    #[test]
    fn test_generate_without_reference_is_inert() {
        let mut app = test_app();
        let _ = app.update(Message::Generate);
        assert_eq!(app.status, AppStatus::Idle);
        assert!(app.output.is_none());
    }

    #[test]
    fn test_new_reference_replaces_old() {
        let mut app = test_app();
        let _ = app.update(Message::ReferenceLoaded(Ok(test_photo(100, 200))));
        let _ = app.update(Message::ReferenceLoaded(Ok(test_photo(300, 100))));

        let reference = app.reference.as_ref().unwrap();
        assert_eq!((reference.width, reference.height), (300, 100));
    }
}
