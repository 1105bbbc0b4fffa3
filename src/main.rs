//! Water Wheel entry point
//!
//! Handles platform-specific initialization and runs the animation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use water_wheel::Settings;
    use water_wheel::animation::{Animation, step};
    use water_wheel::platform::BrowserInterval;
    use water_wheel::renderer::{RenderState, SceneOptions, WheelRenderer};
    use water_wheel::sim::Wheel;

    /// App instance holding all state
    struct App {
        wheel: Wheel,
        settings: Settings,
        renderer: WheelRenderer,
        animation: Animation<BrowserInterval>,
    }

    impl App {
        fn redraw(&mut self) {
            self.renderer.draw(&self.wheel);
        }

        /// One animation frame: tick, then redraw
        fn on_tick(&mut self) {
            step(&mut self.wheel, &mut self.renderer);
        }

        /// Copy the live tunables into the stored settings
        fn persist(&mut self) {
            self.settings.fill_rate = self.wheel.fill_rate();
            self.settings.drain_rate = self.wheel.drain_rate();
            self.settings.friction = self.wheel.friction();
            self.settings.num_buckets = self.wheel.num_buckets();
            self.settings.save();
        }
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn to_js(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Run `f` against the live app, save the new tunables, then redraw
    fn with_app(f: impl FnOnce(&mut App)) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                let mut app = app.borrow_mut();
                f(&mut app);
                app.persist();
                app.redraw();
            }
        });
    }

    fn toggle(app: &Rc<RefCell<App>>) {
        let tick_app = app.clone();
        let mut a = app.borrow_mut();
        let result = a.animation.toggle_with(move |period| {
            BrowserInterval::start(period, move || tick_app.borrow_mut().on_tick())
        });
        match result {
            Ok(state) => log::info!("Animation {:?}", state),
            Err(e) => log::error!("Could not start animation: {:?}", e),
        }
    }

    #[wasm_bindgen]
    pub fn toggle_animating() {
        let app = APP.with(|slot| slot.borrow().clone());
        if let Some(app) = app {
            toggle(&app);
        }
    }

    #[wasm_bindgen]
    pub fn set_fill_rate(rate: f32) {
        with_app(|app| app.wheel.set_fill_rate(rate));
    }

    #[wasm_bindgen]
    pub fn set_drip_rate(rate: f32) {
        with_app(|app| app.wheel.set_drip_rate(rate));
    }

    #[wasm_bindgen]
    pub fn set_friction(friction: f32) {
        with_app(|app| app.wheel.set_friction(friction));
    }

    #[wasm_bindgen]
    pub fn set_base_bucket_width(width: f32) {
        with_app(|app| app.wheel.set_base_bucket_width(width));
    }

    #[wasm_bindgen]
    pub fn add_bucket() {
        with_app(|app| {
            let count = app.wheel.add_bucket();
            log::info!("Buckets: {}", count);
        });
    }

    #[wasm_bindgen]
    pub fn remove_bucket() {
        with_app(|app| match app.wheel.remove_bucket() {
            Ok(count) => log::info!("Buckets: {}", count),
            Err(e) => log::warn!("{}", e),
        });
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(to_js)?;

        log::info!("Water Wheel starting...");

        let settings = Settings::load();

        let window = web_sys::window().ok_or_else(|| to_js("no window"))?;
        let document = window.document().ok_or_else(|| to_js("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| to_js("no canvas"))?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize simulation
        let seed = js_sys::Date::now() as u64;
        let wheel = Wheel::new(settings.wheel_config(seed)).map_err(to_js)?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(to_js)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(to_js)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, settings.canvas_size)
            .await
            .map_err(to_js)?;
        let options = SceneOptions {
            show_spokes: settings.show_spokes,
            show_chart: settings.show_chart,
            ..Default::default()
        };

        let app = Rc::new(RefCell::new(App {
            wheel,
            renderer: WheelRenderer::new(render_state, options),
            animation: Animation::new(settings.tick_interval()),
            settings,
        }));

        // Drawn once; animation waits for a click
        app.borrow_mut().redraw();

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle(&app);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        APP.with(|slot| *slot.borrow_mut() = Some(app));

        log::info!("Water Wheel ready - click to start");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Water Wheel (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the rendered web version");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = water_wheel::Settings::load_or_default(path.as_deref());

    if let Err(e) = native::run_headless(&settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::{Arc, Mutex, PoisonError};
    use std::thread;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use water_wheel::Settings;
    use water_wheel::animation::{Animation, TickLogger};
    use water_wheel::platform::ThreadInterval;
    use water_wheel::sim::Wheel;

    /// Animate for `headless_seconds`, then print a JSON summary
    pub fn run_headless(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let wheel = Arc::new(Mutex::new(Wheel::new(settings.wheel_config(seed))?));

        let mut animation = Animation::new(settings.tick_interval());
        animation.toggle_with(|period| {
            ThreadInterval::start(period, wheel.clone(), TickLogger::new(30))
        })?;

        let run_for = Duration::try_from_secs_f32(settings.headless_seconds).unwrap_or(Duration::ZERO);
        thread::sleep(run_for);
        animation.stop();

        let wheel = wheel.lock().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Ran {} ticks, {} buckets, total mass {:.1}",
            wheel.time_ticks(),
            wheel.num_buckets(),
            wheel.total_mass()
        );
        println!("{}", serde_json::to_string_pretty(&wheel.summary())?);
        Ok(())
    }
}
