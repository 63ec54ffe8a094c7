use timeleap_compare::{
    ComparisonView, Pavilion, ScenePlacement, SiteCatalog, SiteContext, SiteRecord,
    StructureModel, ViewConfig,
};
use timeleap_engine::coords::{Rect, Vec2};
use timeleap_engine::core::{App, AppControl, FrameCtx};
use timeleap_engine::device::Gpu;
use timeleap_engine::input::{InputEvent, Key, KeyState};
use timeleap_engine::paint::Color;
use timeleap_engine::render::{
    MeshDraw, MeshId, MeshRenderer, ScenePass, ShapeRenderer, TextRenderer,
};
use timeleap_engine::scene::{DrawList, ZIndex};
use timeleap_engine::text::{FontId, FontSystem};
use timeleap_engine::window::CursorIcon;

const BACKGROUND: Color = Color::from_premul(0.07, 0.065, 0.06, 1.0);

/// Whether structure meshes are on the GPU yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Meshes {
    Pending,
    Ready,
    Unavailable,
}

/// What a key press outside the view asks for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Command {
    Select(usize),
    Exit,
}

fn command_for(key: Key, current: usize, catalog: &SiteCatalog) -> Option<Command> {
    match key {
        Key::Escape => Some(Command::Exit),
        Key::BracketRight | Key::ArrowRight => Some(Command::Select(catalog.next_index(current))),
        Key::BracketLeft | Key::ArrowLeft => Some(Command::Select(catalog.prev_index(current))),
        other => other
            .digit_index()
            .filter(|&i| i < catalog.len())
            .map(Command::Select),
    }
}

/// Engine application: one comparison view plus the renderers that draw it.
pub struct ViewerApp {
    view: ComparisonView,
    model: Pavilion,
    catalog: SiteCatalog,
    site_index: usize,

    fonts: FontSystem,
    font: Option<FontId>,

    meshes: Meshes,
    slots: Vec<MeshId>,
    mesh_renderer: MeshRenderer,
    shape_renderer: ShapeRenderer,
    text_renderer: TextRenderer,

    cursor: CursorIcon,
}

impl ViewerApp {
    pub fn new(config: ViewConfig, catalog: SiteCatalog, start: usize, font_bytes: Vec<u8>) -> Self {
        let mut fonts = FontSystem::new();
        let font = match fonts.load_font(&font_bytes) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("{e}; labels will not be drawn");
                None
            }
        };

        let model = Pavilion::default();
        let site = catalog
            .by_index(start)
            .map(SiteContext::from_record)
            .unwrap_or_default();
        let view = ComparisonView::new(config, &model, site);

        Self {
            view,
            model,
            catalog,
            site_index: start,
            fonts,
            font,
            meshes: Meshes::Pending,
            slots: Vec::new(),
            mesh_renderer: MeshRenderer::new(),
            shape_renderer: ShapeRenderer::new(),
            text_renderer: TextRenderer::new(),
            cursor: CursorIcon::Default,
        }
    }

    fn select_site(&mut self, index: usize) {
        if index == self.site_index {
            return;
        }
        if let Some(record) = self.catalog.by_index(index) {
            self.site_index = index;
            self.view.set_site(SiteContext::from_record(record));
        }
    }

    /// Uploads every structure part once, in part order, so a part's index
    /// is its slot.
    fn upload_meshes(&mut self, gpu: Option<&Gpu<'_>>) {
        if self.meshes != Meshes::Pending {
            return;
        }
        let Some(gpu) = gpu else {
            self.view.mark_degraded("no rendering context");
            self.meshes = Meshes::Unavailable;
            return;
        };

        let mut slots = Vec::new();
        for part in self.model.parts() {
            match self.mesh_renderer.upload(gpu.device(), &part.mesh) {
                Ok(id) => slots.push(id),
                Err(e) => {
                    log::error!("uploading {:?} failed: {e:#}", part.kind);
                    self.view.mark_degraded("mesh upload failed");
                    self.meshes = Meshes::Unavailable;
                    return;
                }
            }
        }
        log::info!("uploaded {} meshes for `{}`", slots.len(), self.model.name());
        self.slots = slots;
        self.meshes = Meshes::Ready;
    }

    fn mesh_draws(&self, placement: &ScenePlacement) -> Vec<MeshDraw> {
        placement
            .frame
            .parts
            .iter()
            .filter_map(|part| {
                self.slots.get(part.slot).map(|&mesh| MeshDraw {
                    mesh,
                    model: part.model,
                    material: part.material,
                })
            })
            .collect()
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.upload_meshes(ctx.gpu.as_deref());
        self.view.layout(ctx.window.viewport());

        // ── Input ─────────────────────────────────────────────────────────
        for event in &ctx.input_frame.events {
            if self.view.handle_event(event).is_consumed() {
                continue;
            }
            if let InputEvent::Key { key, state: KeyState::Pressed, .. } = event {
                match command_for(*key, self.site_index, &self.catalog) {
                    Some(Command::Exit) => return AppControl::Exit,
                    Some(Command::Select(i)) => self.select_site(i),
                    None => {}
                }
            }
        }

        // ── Update ────────────────────────────────────────────────────────
        self.view.tick(ctx.time.dt);

        let cursor = self.view.cursor();
        if cursor != self.cursor {
            ctx.window.set_cursor(cursor);
            self.cursor = cursor;
        }

        // ── Paint ─────────────────────────────────────────────────────────
        self.view.paint_overlay(&self.fonts, self.font);
        if let (Some(font), Some(record)) = (self.font, self.catalog.by_index(self.site_index)) {
            let below = Rect::new(
                0.0,
                self.view.container().bottom(),
                self.view.container().size.x,
                ctx.window.viewport().height - self.view.container().bottom(),
            );
            paint_site_panel(&mut self.view.overlay, font, below, record);
        }

        if !ctx.has_gpu() {
            return AppControl::Continue;
        }

        let placements = self.view.scene_frames();
        let draws: Vec<Vec<MeshDraw>> = placements.iter().map(|p| self.mesh_draws(p)).collect();
        let passes: Vec<ScenePass<'_>> = placements
            .iter()
            .zip(&draws)
            .map(|(p, draws)| ScenePass {
                region: p.region,
                clip: p.clip,
                view_proj: p.frame.view_proj,
                eye: p.frame.eye,
                light_dir: p.frame.light_dir,
                sky: p.frame.sky,
                draws,
            })
            .collect();

        // ── Render ────────────────────────────────────────────────────────
        let meshes = &mut self.mesh_renderer;
        let shapes = &mut self.shape_renderer;
        let text = &mut self.text_renderer;
        let overlay = &mut self.view.overlay;
        let fonts = &self.fonts;

        ctx.render(BACKGROUND, |rctx, target| {
            meshes.render(rctx, target, &passes);
            shapes.render(rctx, target, overlay);
            text.render(rctx, target, overlay, fonts);
        })
    }
}

/// Site details under the comparison band.
fn paint_site_panel(dl: &mut DrawList, font: FontId, area: Rect, record: &SiteRecord) {
    if area.is_empty() {
        return;
    }
    let x = area.origin.x + 24.0;
    let mut y = area.origin.y + 20.0;
    let dim = Color::from_straight(0.75, 0.72, 0.68, 1.0);

    dl.push_clip(area);
    dl.push_text(ZIndex(0), record.name.as_str(), font, 26.0, Color::WHITE, Vec2::new(x, y));
    y += 36.0;
    dl.push_text(ZIndex(0), record.location.as_str(), font, 15.0, dim, Vec2::new(x, y));
    y += 24.0;
    if let Some(status) = &record.unesco_status {
        dl.push_text(ZIndex(0), status.as_str(), font, 15.0, dim, Vec2::new(x, y));
        y += 24.0;
    }
    let hint = "Drag the handle to compare · [ ] or 1-9 to change site · R to reset";
    dl.push_text(ZIndex(0), hint, font, 13.0, dim.with_alpha(0.7), Vec2::new(x, y + 8.0));
    dl.pop_clip();
}
