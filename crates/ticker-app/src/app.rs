use ticker_engine::coords::{ColorRgba, Viewport};
use ticker_engine::core::{App, AppControl, FrameCtx};
use ticker_engine::render::shapes::line::LineRenderer;
use ticker_engine::render::shapes::text::{AtlasImage, SdfTextRenderer, TextDraw};

use crate::scene::TickerScene;

/// Drives a [`TickerScene`] from the runtime's frame callbacks.
pub struct TickerApp {
    scene: TickerScene,
    text: SdfTextRenderer,
    line: LineRenderer,
    clear: ColorRgba,
}

impl TickerApp {
    pub fn new(scene: TickerScene, atlas: AtlasImage, clear: ColorRgba) -> Self {
        Self {
            scene,
            text: SdfTextRenderer::new(atlas),
            line: LineRenderer::new(),
            clear,
        }
    }
}

impl App for TickerApp {
    fn on_resize(&mut self, viewport: Viewport) {
        // Minimized windows report a zero-area viewport; keep the last layout.
        if viewport.is_valid() {
            self.scene.set_aspect_ratio(viewport.aspect_ratio());
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.scene.update(ctx.time.elapsed);

        let Self { scene, text, line, clear } = self;
        let draws = scene.labels().map(|label| TextDraw {
            geometry: label.geometry(),
            color: label.color(),
        });

        ctx.render(*clear, |rctx, target| {
            text.render(rctx, target, &draws);
            line.render(rctx, target, scene.line_mesh(), scene.graph_color());
        })
    }
}
