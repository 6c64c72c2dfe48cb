//! Interaction state machine for the playground.
//!
//! [`Controller`] owns everything that changes while the app runs: the
//! bodies, the runtime [`SimParams`], the snapshot taken at start, the open
//! editor and the frame [`Ticker`]. Hosts feed it clicks, control changes
//! and frame callbacks, and read back a [`RenderView`] to draw.
//!
//! Bodies can only be placed or edited while the simulation is stopped.
//! Once running, the engine has exclusive control until a wall is hit or
//! the user restarts or clears.

use anyhow::Context;
use glam::Vec2;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    body::{Body, hit_test},
    config::Config,
    engine,
    params::SimParams,
    scheduler::{FrameToken, Ticker},
    types::{BodyId, Canvas, Rgb},
};

/// Editor fields mirrored from the body being edited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleEditor {
    pub id: BodyId,
    pub pos: Vec2,
    pub mass: f32,
    pub vel: Vec2,
}

impl SingleEditor {
    fn seeded_from(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            mass: body.mass,
            vel: body.vel,
        }
    }
}

/// Which editor, if any, is open. Only one can be open at a time.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Editor {
    #[default]
    Closed,
    Single(SingleEditor),
    Bulk,
}

/// Coarse interaction state, derived from the running flag, the editor and
/// the body count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Stopped, no editor, no bodies.
    Idle,
    /// Stopped, no editor, at least one body.
    PlacingAllowed,
    SingleEditorOpen(BodyId),
    BulkEditorOpen,
    Running,
}

/// Editable per-body quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyField {
    Mass,
    Vx,
    Vy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Placed(BodyId),
    Selected(BodyId),
    EditorClosed,
    /// Nothing changed, e.g. placing beyond capacity.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// One step ran; `next` is the frame scheduled after it.
    Stepped { collided: bool, next: FrameToken },
    /// The run ended on this frame without stepping.
    Halted,
    /// The token was cancelled or superseded; nothing happened.
    Stale,
}

/// Everything the draw routine needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub bodies: &'a [Body],
    pub canvas: Canvas,
    pub show_trails: bool,
    pub highlighted: Option<BodyId>,
}

pub struct Controller {
    cfg: Config,
    params: SimParams,
    bodies: Vec<Body>,
    snapshot: Option<Vec<Body>>,
    /// Bodies placed since the last clear; drives ids and palette order.
    placed: u32,
    editor: Editor,
    running: bool,
    ticker: Ticker,
    rng: StdRng,
}

impl Controller {
    /// Creates a controller, seeding the mass sampler from
    /// [`Config::seed`] or the OS.
    ///
    /// ### Errors
    /// Fails if `cfg` does not pass [`Config::validate`].
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(cfg, rng)
    }

    /// Creates a controller that samples masses from `rng`.
    ///
    /// ### Parameters
    /// - `cfg` - Tuned constants; validated before use so that placement
    ///   can never sample from an empty mass range.
    /// - `rng` - Source for initial masses; seed it for reproducible runs.
    ///
    /// ### Errors
    /// Fails if `cfg` does not pass [`Config::validate`].
    pub fn with_rng(cfg: Config, rng: StdRng) -> anyhow::Result<Self> {
        cfg.validate().context("invalid playground config")?;
        let params = SimParams::from_config(&cfg);
        Ok(Self {
            cfg,
            params,
            bodies: Vec::new(),
            snapshot: None,
            placed: 0,
            editor: Editor::Closed,
            running: false,
            ticker: Ticker::new(),
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Current bodies in placement order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Looks up a body by id.
    ///
    /// ### Returns
    /// `None` if no body with `id` exists (e.g. after a clear).
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// The editor currently open, with its mirrored fields.
    pub fn editor(&self) -> Editor {
        self.editor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// `true` once a run has been started since the last clear.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Derives the coarse interaction state.
    ///
    /// Running wins over any editor; with no editor open the body count
    /// decides between [`Phase::Idle`] and [`Phase::PlacingAllowed`].
    pub fn phase(&self) -> Phase {
        if self.running {
            return Phase::Running;
        }
        match self.editor {
            Editor::Single(ed) => Phase::SingleEditorOpen(ed.id),
            Editor::Bulk => Phase::BulkEditorOpen,
            Editor::Closed if self.bodies.is_empty() => Phase::Idle,
            Editor::Closed => Phase::PlacingAllowed,
        }
    }

    /// Whether the Start action is enabled: stopped, with at least one body.
    pub fn can_start(&self) -> bool {
        !self.running && !self.bodies.is_empty()
    }

    /// Whether the Restart action is enabled: at least one body.
    pub fn can_restart(&self) -> bool {
        !self.bodies.is_empty()
    }

    /// Whether the bulk editor can be opened: stopped, with at least one body.
    pub fn can_open_bulk_editor(&self) -> bool {
        !self.running && !self.bodies.is_empty()
    }

    /// Borrows everything the draw routine needs for this frame.
    ///
    /// `highlighted` is the body in the single editor, if one is open.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            bodies: &self.bodies,
            canvas: self.params.canvas,
            show_trails: self.params.show_trails,
            highlighted: match self.editor {
                Editor::Single(ed) => Some(ed.id),
                _ => None,
            },
        }
    }

    /// Handles a click at canvas-local coordinates.
    ///
    /// In order:
    /// 1. While running, closes any editor and does nothing else.
    /// 2. With the bulk editor open, closes it.
    /// 3. On a body, opens the single editor seeded from that body.
    /// 4. With the single editor open, closes it.
    /// 5. Otherwise places a new body, unless the limit is reached.
    ///
    /// A non-finite position is ignored outright, so it can never become
    /// a body position.
    ///
    /// ### Parameters
    /// - `p` - Click position in canvas pixels, origin at the top-left.
    ///
    /// ### Returns
    /// What the click did; [`ClickOutcome::Ignored`] if nothing changed
    /// apart from closing editors during a run.
    pub fn click(&mut self, p: Vec2) -> ClickOutcome {
        if !p.is_finite() {
            warn!("ignoring click at non-finite position {p:?}");
            return ClickOutcome::Ignored;
        }

        if self.running {
            self.close_editors();
            return ClickOutcome::Ignored;
        }

        if self.editor == Editor::Bulk {
            self.close_editors();
            return ClickOutcome::EditorClosed;
        }

        if let Some(id) = hit_test(&self.bodies, p, self.cfg.body_radius) {
            self.close_editors();
            if let Some(body) = self.body(id) {
                self.editor = Editor::Single(SingleEditor::seeded_from(body));
            }
            return ClickOutcome::Selected(id);
        }

        if matches!(self.editor, Editor::Single(_)) {
            self.close_editors();
            return ClickOutcome::EditorClosed;
        }

        self.place(p)
    }

    fn place(&mut self, p: Vec2) -> ClickOutcome {
        if self.bodies.len() >= self.cfg.max_bodies {
            debug!("body limit of {} reached, click ignored", self.cfg.max_bodies);
            return ClickOutcome::Ignored;
        }

        let id = BodyId(self.placed);
        let range = self.cfg.initial_mass;
        let mass = self.rng.random_range(range.min..=range.max);
        let palette = &self.cfg.palette;
        let color = palette
            .get(self.placed as usize % palette.len().max(1))
            .copied()
            .unwrap_or(Rgb::WHITE);

        self.bodies.push(Body::new(id, p, mass, color));
        self.placed += 1;
        debug!("placed {id} at ({:.1}, {:.1}) with mass {mass:.1}", p.x, p.y);
        ClickOutcome::Placed(id)
    }

    /// Starts the run loop and returns the first frame to fire.
    ///
    /// Returns `None` when already running or with no bodies.
    pub fn start(&mut self) -> Option<FrameToken> {
        if !self.can_start() {
            return None;
        }
        self.ticker.cancel();
        self.snapshot = Some(self.bodies.clone());
        self.close_editors();
        self.running = true;
        info!("simulation started with {} bodies", self.bodies.len());
        Some(self.ticker.schedule())
    }

    /// Stops and returns the bodies to how they were at the last start.
    ///
    /// Without a snapshot only the trails are reset. Calling this twice in
    /// a row is the same as calling it once.
    pub fn restart(&mut self) {
        self.ticker.cancel();
        self.running = false;
        self.close_editors();

        match &self.snapshot {
            Some(saved) => {
                self.bodies = saved.clone();
                info!("restored {} bodies from snapshot", self.bodies.len());
            }
            None => info!("no snapshot, resetting trails only"),
        }
        for b in &mut self.bodies {
            b.reset_path();
        }
    }

    /// Stops and removes every body and the snapshot.
    pub fn clear(&mut self) {
        self.ticker.cancel();
        self.bodies.clear();
        self.snapshot = None;
        self.placed = 0;
        self.running = false;
        self.close_editors();
        info!("cleared");
    }

    /// Opens the editor listing every body, closing the single editor.
    ///
    /// ### Returns
    /// `false` (and nothing changes) while running or with no bodies.
    pub fn open_bulk_editor(&mut self) -> bool {
        if !self.can_open_bulk_editor() {
            return false;
        }
        self.close_editors();
        self.editor = Editor::Bulk;
        true
    }

    /// Closes whichever editor is open.
    pub fn close_editors(&mut self) {
        self.editor = Editor::Closed;
    }

    /// Sets one field of a body, clamped into its edit range.
    ///
    /// Rejected while running, for non-finite values and for unknown ids.
    pub fn edit(&mut self, id: BodyId, field: BodyField, value: f32) -> bool {
        if self.running {
            return false;
        }
        if !value.is_finite() {
            warn!("ignoring non-finite {field:?} value for {id}");
            return false;
        }
        let value = match field {
            BodyField::Mass => self.cfg.mass_edit.clamp(value),
            BodyField::Vx | BodyField::Vy => self.cfg.velocity_edit.clamp(value),
        };
        let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) else {
            return false;
        };

        match field {
            BodyField::Mass => body.mass = value,
            BodyField::Vx => body.vel.x = value,
            BodyField::Vy => body.vel.y = value,
        }

        if let Editor::Single(ed) = &mut self.editor
            && ed.id == id
        {
            match field {
                BodyField::Mass => ed.mass = value,
                BodyField::Vx => ed.vel.x = value,
                BodyField::Vy => ed.vel.y = value,
            }
        }
        true
    }

    /// Like [`Controller::edit`], parsing `text` first. Unparseable text
    /// leaves the body unchanged.
    pub fn edit_text(&mut self, id: BodyId, field: BodyField, text: &str) -> bool {
        match text.trim().parse::<f32>() {
            Ok(value) => self.edit(id, field, value),
            Err(_) => {
                warn!("ignoring unparseable {field:?} input {text:?} for {id}");
                false
            }
        }
    }

    /// Sets the trail length (clamped to the configured range) and trims
    /// every existing trail to its newest points.
    pub fn set_trail_length(&mut self, len: usize) {
        let len = self.cfg.clamp_trail_length(len);
        self.params.trail_length = len;
        for b in &mut self.bodies {
            b.truncate_path(len);
        }
    }

    /// Sets the speed multiplier, clamped to the configured range.
    ///
    /// Applies from the next step on; non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            warn!("ignoring non-finite speed");
            return;
        }
        self.params.speed = self.cfg.speed.clamp(speed);
    }

    /// Toggles trail drawing; trails keep being recorded either way.
    pub fn set_show_trails(&mut self, show: bool) {
        self.params.show_trails = show;
    }

    /// Updates the canvas size used for wall clamping.
    ///
    /// Non-positive or non-finite sizes are ignored. Bodies are not moved;
    /// the next step clamps them against the new size.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return;
        }
        self.params.canvas = Canvas::new(width, height);
    }

    /// The frame the host should fire next, if any.
    ///
    /// `None` while stopped, and after the frame that ends a run.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.ticker.pending()
    }

    /// Display-refresh callback.
    ///
    /// A collision is acted on one frame late: the step that hits a wall
    /// still completes and schedules a frame, and that frame ends the run
    /// without moving anything.
    ///
    /// ### Parameters
    /// - `token` - The token from [`Controller::start`], the previous
    ///   [`FrameOutcome::Stepped`] or [`Controller::pending_frame`].
    ///
    /// ### Returns
    /// [`FrameOutcome::Stale`] for a cancelled or superseded token; the
    /// state is not touched in that case.
    pub fn on_frame(&mut self, token: FrameToken) -> FrameOutcome {
        if !self.running || !self.ticker.claim(token) {
            return FrameOutcome::Stale;
        }

        if self.ticker.take_collision() {
            self.running = false;
            info!("simulation halted after wall contact");
            return FrameOutcome::Halted;
        }

        if self.bodies.is_empty() {
            self.running = false;
            return FrameOutcome::Halted;
        }

        let outcome = engine::step(&self.bodies, &self.cfg, &self.params);
        self.bodies = outcome.bodies;
        if outcome.collided {
            debug!("wall contact, stopping on next frame");
            self.ticker.latch_collision();
        }

        FrameOutcome::Stepped {
            collided: outcome.collided,
            next: self.ticker.schedule(),
        }
    }
}
