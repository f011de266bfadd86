//! Winit frontend
//!
//! Opens a window (or binds a canvas on the web), forwards its events to a
//! [`Landing`] and ticks it on every redraw.
//!
//! ```rust,ignore
//! use keyportal::{App, LandingConfig};
//!
//! fn main() -> keyportal::Result<()> {
//!     App::new(LandingConfig::default()).run()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::config::LandingConfig;
use crate::errors::Result;
use crate::frame::FrameState;
use crate::landing::Landing;
use crate::render::{HeadlessRenderer, Renderer};
use crate::utils::Timer;

use self::input_adapter::InputAction;

pub mod input_adapter;

#[cfg(not(target_arch = "wasm32"))]
type HostNavigator = crate::navigation::LogNavigator;

#[cfg(target_arch = "wasm32")]
type HostNavigator = crate::navigation::BrowserNavigator;

/// Application builder.
pub struct App<R: Renderer = HeadlessRenderer> {
    config: LandingConfig,
    renderer: R,
    #[cfg(target_arch = "wasm32")]
    canvas_id: Option<String>,
}

impl App<HeadlessRenderer> {
    #[must_use]
    pub fn new(config: LandingConfig) -> Self {
        let renderer = HeadlessRenderer::new(config.render.clone());
        Self {
            config,
            renderer,
            #[cfg(target_arch = "wasm32")]
            canvas_id: None,
        }
    }
}

impl<R: Renderer + 'static> App<R> {
    /// Swaps in a drawing backend.
    #[must_use]
    pub fn with_renderer<S: Renderer + 'static>(self, renderer: S) -> App<S> {
        App {
            config: self.config,
            renderer,
            #[cfg(target_arch = "wasm32")]
            canvas_id: self.canvas_id,
        }
    }

    /// ID of the canvas element to bind (WASM only).
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn with_canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = Some(id.into());
        self
    }

    /// Blocks until the window closes or a destination is opened.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self.config, self.renderer);
        event_loop.run_app(&mut runner)?;
        Ok(())
    }

    /// Hands the event loop to the browser and returns immediately.
    #[cfg(target_arch = "wasm32")]
    pub fn run(self) -> Result<()> {
        use winit::platform::web::EventLoopExtWebSys;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self.config, self.renderer);
        runner.canvas_id = self.canvas_id;
        event_loop.spawn_app(runner);
        Ok(())
    }
}

struct AppRunner<R: Renderer> {
    /// Taken when the window comes up.
    pending: Option<(LandingConfig, R)>,
    window: Option<Arc<Window>>,
    landing: Option<Landing<R, HostNavigator>>,
    timer: Timer,

    #[cfg(target_arch = "wasm32")]
    canvas_id: Option<String>,
    /// Kept alive for as long as the listener is registered.
    #[cfg(target_arch = "wasm32")]
    key_guard: Option<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
}

impl<R: Renderer> AppRunner<R> {
    fn new(config: LandingConfig, renderer: R) -> Self {
        Self {
            pending: Some((config, renderer)),
            window: None,
            landing: None,
            timer: Timer::new(),
            #[cfg(target_arch = "wasm32")]
            canvas_id: None,
            #[cfg(target_arch = "wasm32")]
            key_guard: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn window_attributes(&self, config: &LandingConfig) -> Option<winit::window::WindowAttributes> {
        Some(
            Window::default_attributes()
                .with_title(&config.window.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height)),
        )
    }

    #[cfg(target_arch = "wasm32")]
    fn window_attributes(&self, config: &LandingConfig) -> Option<winit::window::WindowAttributes> {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let canvas_id = self.canvas_id.as_deref().unwrap_or("keyportal-canvas");
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());

        let Some(canvas) = canvas else {
            log::error!("Canvas element '{canvas_id}' not found");
            return None;
        };
        canvas.set_attribute("tabindex", "0").ok();
        canvas.focus().ok();

        Some(
            Window::default_attributes()
                .with_title(&config.window.title)
                .with_canvas(Some(canvas))
                .with_prevent_default(false),
        )
    }

    /// Listens on `window` so F1 and Space lose their browser default
    /// whichever element has focus. Other keys are left alone.
    #[cfg(target_arch = "wasm32")]
    fn install_key_guard(&mut self) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            log::warn!("No window, browser defaults stay active");
            return;
        };

        let guard = Closure::wrap(Box::new(|event: web_sys::KeyboardEvent| {
            if crate::dispatch::InputDispatcher::prevents_default(crate::input::Key::from_dom_code(&event.code())) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        if let Err(err) = window.add_event_listener_with_callback("keydown", guard.as_ref().unchecked_ref()) {
            log::warn!("Failed to install keydown listener: {err:?}");
            return;
        }
        self.key_guard = Some(guard);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(landing) = self.landing.as_mut() else {
            return;
        };
        self.timer.tick();
        let report = landing.update(FrameState::from_timer(&self.timer));

        if let Some(id) = report.navigated {
            log::info!("{id} key finished its fly-away");
            #[cfg(not(target_arch = "wasm32"))]
            {
                if landing.navigator().should_exit() {
                    event_loop.exit();
                    return;
                }
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = event_loop;

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl<R: Renderer> ApplicationHandler for AppRunner<R> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some((config, renderer)) = self.pending.take() else {
            return;
        };
        let Some(attributes) = self.window_attributes(&config) else {
            event_loop.exit();
            return;
        };

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        self.install_key_guard();

        let mut landing = Landing::new(config, renderer, HostNavigator::default());
        let size = window.inner_size();
        landing.resize(size.width, size.height);
        if let Err(err) = landing.request_assets() {
            log::error!("Asset loading unavailable: {err}");
        }

        self.window = Some(window);
        self.landing = Some(landing);
        self.timer = Timer::new();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(landing) = self.landing.as_mut() else {
            return;
        };

        match input_adapter::process_window_event(landing.input_mut(), &event) {
            Some(InputAction::KeyPressed(key)) => {
                let response = landing.handle_key(key);
                if let Some(id) = response.triggered {
                    log::debug!("{id} key pressed from keyboard");
                }
                if response.prevent_default {
                    log::trace!("{key:?}: default action suppressed");
                }
            }
            Some(InputAction::Click { x, y }) => {
                let hits = landing.handle_click(glam::Vec2::new(x, y));
                if !hits.is_empty() {
                    log::debug!("Clicked {hits:?}");
                }
            }
            None => {}
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => landing.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.landing.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
