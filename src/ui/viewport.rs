//! 3D viewport canvas
//!
//! Draws the camera rig (billboard, guide rings, camera marker) by
//! projecting the scene geometry onto the canvas, and lets the user orbit
//! and zoom the *viewing* camera with drag and scroll. The viewing camera
//! is presentation state only; it never touches the picked parameters.

use cgmath::{InnerSpace, Point3, Vector3};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::scene::rig::{CameraRig, RING_CENTER_HEIGHT};
use crate::Message;

const BACKGROUND: Color = Color::from_rgb(0.008, 0.024, 0.09);
const GRID_COLOR: Color = Color::from_rgba(0.12, 0.16, 0.23, 0.8);
const RING_H_COLOR: Color = Color::from_rgba(0.13, 0.83, 0.93, 0.45);
const RING_V_COLOR: Color = Color::from_rgba(0.96, 0.45, 0.71, 0.45);
const GUIDE_COLOR: Color = Color::from_rgba(0.96, 0.45, 0.71, 0.35);
const BILLBOARD_FILL: Color = Color::from_rgba(0.12, 0.16, 0.23, 0.85);
const BILLBOARD_EDGE: Color = Color::from_rgba(0.58, 0.64, 0.72, 0.9);
const CAMERA_BODY: Color = Color::from_rgb(0.23, 0.51, 0.96);
const CAMERA_LENS: Color = Color::from_rgb(0.96, 0.45, 0.71);
const HINT_COLOR: Color = Color::from_rgba(0.78, 0.78, 0.78, 0.5);

/// Viewing camera orbit: distance from the focus, fixed beyond the rig's
/// maximum orbit radius so the whole scene stays in front of the eye
const VIEW_RADIUS: f32 = 14.0;

/// The camera rig visualization
#[derive(Debug)]
pub struct Viewport {
    rig: CameraRig,
    has_reference: bool,
}

impl Viewport {
    pub fn new(rig: CameraRig, has_reference: bool) -> Self {
        Self { rig, has_reference }
    }
}

/// Orbiting view camera plus drag bookkeeping; persists across frames
#[derive(Debug, Clone)]
pub struct ViewCamera {
    pub yaw: f32,
    pub pitch: f32,
    /// Screen pixels per world unit
    pub zoom: f32,
    dragging: bool,
    last_position: Option<Point>,
}

impl Default for ViewCamera {
    fn default() -> Self {
        // Matches an initial eye around (5, 4, 7) looking at the rig center
        Self {
            yaw: 0.62,
            pitch: 0.44,
            zoom: 45.0,
            dragging: false,
            last_position: None,
        }
    }
}

impl ViewCamera {
    fn focus() -> Point3<f32> {
        Point3::new(0.0, RING_CENTER_HEIGHT, 0.0)
    }

    fn eye(&self) -> Point3<f32> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Self::focus() + Vector3::new(cp * sy, sp, cp * cy) * VIEW_RADIUS
    }

    /// Project a world point onto the canvas. Returns `None` behind the eye.
    fn project(&self, p: Point3<f32>, bounds: Rectangle) -> Option<Point> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let forward = Vector3::new(-cp * sy, -sp, -cp * cy);
        let right = Vector3::new(cy, 0.0, -sy);
        let up = Vector3::new(-sp * sy, cp, -sp * cy);

        let d = p - self.eye();
        let depth = d.dot(forward);
        if depth < 0.1 {
            return None;
        }

        // Orthographic: direct scale, no perspective division
        let x = d.dot(right) * self.zoom;
        let y = d.dot(up) * self.zoom;
        Some(Point::new(
            bounds.width / 2.0 + x,
            bounds.height / 2.0 - y,
        ))
    }
}

/// Stroke a polyline, lifting the pen over culled points
fn stroke_polyline(
    frame: &mut canvas::Frame,
    points: impl Iterator<Item = Option<Point>>,
    stroke: canvas::Stroke,
) {
    let projected: Vec<Option<Point>> = points.collect();
    let path = canvas::Path::new(|b| {
        let mut pen_down = false;
        for p in &projected {
            match p {
                Some(p) if pen_down => b.line_to(*p),
                Some(p) => {
                    b.move_to(*p);
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
    });
    frame.stroke(&path, stroke);
}

fn solid_stroke(color: Color, width: f32) -> canvas::Stroke<'static> {
    canvas::Stroke::default().with_color(color).with_width(width)
}

impl Program<Message> for Viewport {
    type State = ViewCamera;

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let view = state;

        frame.fill_rectangle(
            Point::ORIGIN,
            Size::new(bounds.width, bounds.height),
            BACKGROUND,
        );

        // Ground grid on the XZ plane
        let span = 5;
        for i in -span..=span {
            let t = i as f32;
            let s = span as f32;
            stroke_polyline(
                &mut frame,
                [
                    view.project(Point3::new(t, 0.0, -s), bounds),
                    view.project(Point3::new(t, 0.0, s), bounds),
                ]
                .into_iter(),
                solid_stroke(GRID_COLOR, 1.0),
            );
            stroke_polyline(
                &mut frame,
                [
                    view.project(Point3::new(-s, 0.0, t), bounds),
                    view.project(Point3::new(s, 0.0, t), bounds),
                ]
                .into_iter(),
                solid_stroke(GRID_COLOR, 1.0),
            );
        }

        // Guide rings
        stroke_polyline(
            &mut frame,
            self.rig
                .horizontal_ring
                .iter()
                .map(|p| view.project(*p, bounds)),
            solid_stroke(RING_H_COLOR, 1.0),
        );
        stroke_polyline(
            &mut frame,
            self.rig
                .vertical_ring
                .iter()
                .map(|p| view.project(*p, bounds)),
            solid_stroke(RING_V_COLOR, 1.0),
        );

        // Dashed guide from the ring center to the camera
        stroke_polyline(
            &mut frame,
            [
                view.project(self.rig.target(), bounds),
                view.project(self.rig.camera, bounds),
            ]
            .into_iter(),
            canvas::Stroke {
                line_dash: canvas::LineDash {
                    segments: &[4.0, 4.0],
                    offset: 0,
                },
                ..solid_stroke(GUIDE_COLOR, 1.0)
            },
        );

        // Subject billboard, a framed plane standing on the ground
        let corners = self.rig.billboard.corners();
        let projected: Vec<Option<Point>> =
            corners.iter().map(|c| view.project(*c, bounds)).collect();
        if let [Some(a), Some(b), Some(c), Some(d)] = projected[..] {
            let plane = canvas::Path::new(|builder| {
                builder.move_to(a);
                builder.line_to(b);
                builder.line_to(c);
                builder.line_to(d);
                builder.close();
            });
            if self.has_reference {
                frame.fill(&plane, BILLBOARD_FILL);
            }
            frame.stroke(&plane, solid_stroke(BILLBOARD_EDGE, 1.5));

            if !self.has_reference {
                // Wireframe diagonals stand in for the missing photo
                let cross = canvas::Path::new(|builder| {
                    builder.move_to(a);
                    builder.line_to(c);
                    builder.move_to(b);
                    builder.line_to(d);
                });
                frame.stroke(&cross, solid_stroke(GRID_COLOR, 1.0));
            }
        }

        // Camera marker: body plus a lens dot toward the subject
        if let Some(body) = view.project(self.rig.camera, bounds) {
            let toward = (self.rig.target() - self.rig.camera).normalize();
            let lens_world = self.rig.camera + toward * 0.45;

            let radius = (view.zoom * 0.14).clamp(4.0, 12.0);
            frame.fill(&canvas::Path::circle(body, radius), CAMERA_BODY);
            if let Some(lens) = view.project(lens_world, bounds) {
                frame.fill(&canvas::Path::circle(lens, radius * 0.45), CAMERA_LENS);
            }
        }

        frame.fill_text(canvas::Text {
            content: "Drag: orbit view   Scroll: zoom view".to_string(),
            position: Point::new(10.0, 8.0),
            color: HINT_COLOR,
            size: 12.0.into(),
            ..canvas::Text::default()
        });

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse wheel zooms the viewing camera
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.position_over(bounds).is_none() {
                    return (canvas::event::Status::Ignored, None);
                }
                let zoom_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                state.zoom = (state.zoom * (1.0 + zoom_delta)).clamp(15.0, 150.0);
                return (canvas::event::Status::Captured, None);
            }

            // Mouse button press - start orbiting
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    state.dragging = true;
                    state.last_position = Some(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop orbiting
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.dragging = false;
                state.last_position = None;
                return (canvas::event::Status::Captured, None);
            }

            // Mouse move - orbit if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.dragging {
                    if let Some(current) = cursor.position() {
                        if let Some(last) = state.last_position {
                            state.yaw -= (current.x - last.x) * 0.01;
                            state.pitch =
                                (state.pitch + (current.y - last.y) * 0.01).clamp(-1.35, 1.35);
                            state.last_position = Some(current);
                            return (canvas::event::Status::Captured, None);
                        }
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            mouse::Interaction::Grabbing
        } else if cursor.position_over(bounds).is_some() {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_focus_projects_to_center() {
        let view = ViewCamera::default();
        let p = view.project(ViewCamera::focus(), bounds()).unwrap();
        assert!((p.x - 400.0).abs() < 0.5);
        assert!((p.y - 300.0).abs() < 0.5);
    }

    #[test]
    fn test_point_behind_eye_is_culled() {
        let view = ViewCamera::default();
        // Far along the eye direction, well behind the viewing camera
        let eye = view.eye();
        let behind = eye + (eye - ViewCamera::focus());
        assert!(view.project(behind, bounds()).is_none());
    }

    #[test]
    fn test_higher_world_point_is_higher_on_screen() {
        let view = ViewCamera::default();
        let low = view.project(Point3::new(0.0, 0.0, 0.0), bounds()).unwrap();
        let high = view.project(Point3::new(0.0, 2.0, 0.0), bounds()).unwrap();
        assert!(high.y < low.y);
    }
}
