mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use skyburst::{Result, SkyburstError};

fn sdl_err(e: impl ToString) -> SkyburstError {
    SkyburstError::Sdl(e.to_string())
}

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    MouseDown {
        x: i32,
        button: MouseButtonKind,
    },
    Resized {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
}

impl Display {
    /// Create a resizable window
    /// vsync=true: locked to monitor refresh (typically 60fps)
    /// vsync=false: the host paces frames itself
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(sdl_err)?;
        let video_subsystem = sdl_context.video().map_err(sdl_err)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(sdl_err)?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(sdl_err)?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(sdl_err)?;

        Ok((
            Self {
                canvas,
                event_pump,
            },
            texture_creator,
        ))
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
        if target.width != buffer.width() || target.height != buffer.height() {
            // Resize raced the frame; skip rather than upload a mismatched buffer
            return Ok(());
        }
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(sdl_err)?;

        self.canvas.copy(&target.texture, None, None).map_err(sdl_err)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseButtonDown { x, mouse_btn, .. } => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        events.push(InputEvent::MouseDown { x, button });
                    }
                },
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } if w > 0 && h > 0 => {
                    events.push(InputEvent::Resized {
                        width: w as u32,
                        height: h as u32,
                    });
                },
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture matching the pixel buffer size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(sdl_err)?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}

fn map_mouse_button(btn: MouseButton) -> Option<MouseButtonKind> {
    match btn {
        MouseButton::Left => Some(MouseButtonKind::Left),
        MouseButton::Right => Some(MouseButtonKind::Right),
        MouseButton::Middle => Some(MouseButtonKind::Middle),
        _ => None,
    }
}
