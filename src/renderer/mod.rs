//! WebGPU rendering module
//!
//! `scene` and `chart` turn wheel state into flat-colored triangles in
//! canvas coordinates; `pipeline` uploads and draws them.

pub mod chart;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use chart::ChartLayout;
pub use pipeline::{RenderError, RenderState};
pub use scene::{SceneOptions, wheel_vertices};
pub use vertex::Vertex;

use crate::animation::WheelObserver;
use crate::sim::{TickReport, Wheel};

/// Redraws the wheel whenever it changes
pub struct WheelRenderer {
    pub state: RenderState,
    pub options: SceneOptions,
}

impl WheelRenderer {
    pub fn new(state: RenderState, options: SceneOptions) -> Self {
        Self { state, options }
    }

    /// Draw one frame of `wheel`
    pub fn draw(&mut self, wheel: &Wheel) {
        let vertices = wheel_vertices(wheel, &self.options);
        match self.state.render(&vertices) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                self.state.resize(self.state.size.0, self.state.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl WheelObserver for WheelRenderer {
    fn wheel_changed(&mut self, wheel: &Wheel, _report: &TickReport) {
        self.draw(wheel);
    }
}
