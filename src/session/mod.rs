// SPDX-License-Identifier: MPL-2.0
//! Tool session state machine.
//!
//! A [`ToolSession`] owns everything one editor instance mutates: the loaded
//! source, the current [`EffectParameters`], and the surfaces derived from
//! them. Callers change parameters, then call [`ToolSession::recompute`]
//! (or use [`ToolSession::set_parameters`], which does both).
//!
//! # Stale loads
//!
//! Decoding is asynchronous. Each load takes a [`LoadTicket`] stamped with the
//! session generation; starting another load or resetting bumps the
//! generation, and a completion carrying an older ticket is dropped.

use crate::application::tools::{self, CropMode, ToolOutput};
use crate::brush::{map_pointer, PaintEngine};
use crate::error::{Error, Result};
use crate::media::source::{FileInput, RasterSource, SourceId};
use crate::render::background::{render_background, CanvasSize};
use crate::render::filter_stack::GlobalFilters;
use crate::render::profile_crop::render_profile;
use crate::render::surface::DrawSurface;
use crate::render::text::GlyphOutliner;
use crate::render::watermark::render_watermark;
use crate::render::EffectParameters;
use std::sync::Arc;

/// Proof that a load was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The source was installed and the surface recomputed.
    Applied(SourceId),
    /// A newer load or a reset happened first; the result was discarded.
    Stale,
}

/// Paint engine together with the filters it was built from.
#[derive(Debug, Clone)]
struct EffectsState {
    filters: GlobalFilters,
    engine: PaintEngine,
}

/// State of one tool instance.
pub struct ToolSession {
    generation: u64,
    source: Option<RasterSource>,
    params: EffectParameters,
    canvas_size: CanvasSize,
    glyphs: Option<Arc<dyn GlyphOutliner>>,
    effects: Option<EffectsState>,
    preview: Option<DrawSurface>,
}

impl std::fmt::Debug for ToolSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSession")
            .field("generation", &self.generation)
            .field("source", &self.source.as_ref().map(RasterSource::name))
            .field("params", &self.params)
            .field("canvas_size", &self.canvas_size)
            .field("has_glyphs", &self.glyphs.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ToolSession {
    fn default() -> Self {
        Self::new(EffectParameters::default())
    }
}

impl ToolSession {
    #[must_use]
    pub fn new(params: EffectParameters) -> Self {
        Self {
            generation: 0,
            source: None,
            params,
            canvas_size: CanvasSize::default(),
            glyphs: None,
            effects: None,
            preview: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn source(&self) -> Option<&RasterSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn parameters(&self) -> &EffectParameters {
        &self.params
    }

    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    /// Current rendered surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&DrawSurface> {
        match &self.effects {
            Some(state) => Some(state.engine.surface()),
            None => self.preview.as_ref(),
        }
    }

    /// Brush strokes applied since the last rebuild or reset.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.effects.as_ref().map_or(0, |s| s.engine.stroke_count())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Starts a load, invalidating any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Installs a decoded source if `ticket` is still current.
    ///
    /// Stale completions are dropped whether they succeeded or not.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<RasterSource>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale load (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return Ok(LoadOutcome::Stale);
        }
        let source = result?;
        let id = source.id();
        self.install_source(source);
        self.recompute()?;
        Ok(LoadOutcome::Applied(id))
    }

    /// Decodes `input` off the async executor and installs it.
    pub async fn load(&mut self, input: FileInput) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = RasterSource::load_async(input).await;
        self.complete_load(ticket, result)
    }

    fn install_source(&mut self, source: RasterSource) {
        if let Some(previous) = self.source.replace(source) {
            log::debug!("released source {} ({})", previous.id().value(), previous.name());
        }
        self.effects = None;
        self.preview = None;
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Replaces the parameters and redraws.
    pub fn set_parameters(&mut self, params: EffectParameters) -> Result<()> {
        self.params = params;
        self.recompute()
    }

    /// Mutates the parameters in place and redraws.
    pub fn update_parameters(&mut self, f: impl FnOnce(&mut EffectParameters)) -> Result<()> {
        f(&mut self.params);
        self.recompute()
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) -> Result<()> {
        self.canvas_size = size;
        self.recompute()
    }

    /// Sets the text outliner used by watermark rendering and redraws.
    pub fn set_glyphs(&mut self, glyphs: Arc<dyn GlyphOutliner>) -> Result<()> {
        self.glyphs = Some(glyphs);
        self.recompute()
    }

    /// Redraws the surface from the current parameters.
    ///
    /// In effects mode the paint engine is rebuilt only when the global
    /// filters changed, so brush-only changes keep accumulated strokes.
    pub fn recompute(&mut self) -> Result<()> {
        if let Some(spec) = self.params.background() {
            self.effects = None;
            self.preview = Some(render_background(&spec, self.canvas_size)?);
            return Ok(());
        }

        let Some(source) = &self.source else {
            self.effects = None;
            self.preview = None;
            return Ok(());
        };

        match &self.params {
            EffectParameters::Effects { filters, .. } => {
                let current = self.effects.as_ref().map(|s| &s.filters);
                if current != Some(filters) {
                    let engine = PaintEngine::new(source.pixels(), filters)?;
                    self.effects = Some(EffectsState {
                        filters: *filters,
                        engine,
                    });
                }
                self.preview = None;
            }
            EffectParameters::Watermark(spec) => {
                let glyphs = self.glyphs.as_deref().ok_or_else(|| {
                    Error::InvalidParameter("no font loaded for watermark text".into())
                })?;
                self.effects = None;
                self.preview = Some(render_watermark(source.pixels(), spec, glyphs)?);
            }
            EffectParameters::ProfileCrop(crop) => {
                self.effects = None;
                self.preview = Some(render_profile(&source.to_dynamic(), crop)?);
            }
            EffectParameters::Solid { .. }
            | EffectParameters::LinearGradient { .. }
            | EffectParameters::RadialGradient { .. }
            | EffectParameters::Mesh(_) => {}
        }
        Ok(())
    }

    // =========================================================================
    // Brush
    // =========================================================================

    /// Applies one brush stroke at an on-screen pointer position.
    ///
    /// `displayed` is the on-screen size of the surface.
    pub fn stroke(&mut self, pointer: (f32, f32), displayed: (f32, f32)) -> Result<()> {
        let EffectParameters::Effects { brush, .. } = &self.params else {
            return Err(Error::InvalidParameter(
                "brush strokes need the effects tool".into(),
            ));
        };
        let state = self
            .effects
            .as_mut()
            .ok_or_else(|| Error::InvalidParameter("no image loaded".into()))?;
        let surface = state.engine.surface();
        let at = map_pointer(pointer, (surface.width(), surface.height()), displayed)?;
        state.engine.stroke(at, brush)
    }

    /// Discards brush strokes, keeping the global filters.
    pub fn reset_effects(&mut self) {
        if let Some(state) = &mut self.effects {
            state.engine.reset_strokes();
        }
    }

    /// Releases the source and clears all surfaces.
    ///
    /// Loads still in flight become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        if let Some(source) = self.source.take() {
            log::debug!("released source {} ({})", source.id().value(), source.name());
        }
        self.effects = None;
        self.preview = None;
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Exports the current result with the tool's naming rule.
    pub fn export(&self) -> Result<ToolOutput> {
        if let Some(spec) = self.params.background() {
            return tools::export_background(&spec, self.canvas_size);
        }
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter("no image loaded".into()))?;

        match &self.params {
            EffectParameters::Effects { .. } => {
                let surface = self
                    .surface()
                    .ok_or_else(|| Error::InvalidParameter("nothing to export".into()))?;
                tools::export_edited(source, surface)
            }
            EffectParameters::Watermark(_) => {
                let surface = self.preview.as_ref().ok_or_else(|| {
                    Error::InvalidParameter("no font loaded for watermark text".into())
                })?;
                tools::export_watermarked(source, surface)
            }
            EffectParameters::ProfileCrop(crop) => {
                tools::crop(source, &CropMode::Profile(crop.clone()))
            }
            EffectParameters::Solid { .. }
            | EffectParameters::LinearGradient { .. }
            | EffectParameters::RadialGradient { .. }
            | EffectParameters::Mesh(_) => Err(Error::InvalidParameter(
                "background parameters without a background spec".into(),
            )),
        }
    }
}
