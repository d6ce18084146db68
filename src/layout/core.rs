use crate::dom::DomElement;
use crate::error::Result;
use crate::geometry::Sides;
use crate::layout::grid::{Alignment, Grid, GridError};
use crate::layout::minimum;
use crate::layout::{LayoutItem, RenderConfig};
use crate::logging::{LogLevel, Logger, emit, json_str};
use crate::session::{Session, Statement};

pub(crate) const LOG_TARGET: &str = "trellis::grid";

/// Margin applied around a root layout unless overridden.
pub const DEFAULT_CONTENTS_MARGIN: i32 = 9;

/// Grid layout bound to a container identity.
///
/// Owns the [`Grid`] model plus the rendering state the generator and
/// [`GridLayout::update_dom`] share between renders.
#[derive(Debug)]
pub struct GridLayout {
    pub(super) id: String,
    pub(super) grid: Grid,
    pub(super) margins: Sides,
    pub(super) nested: bool,
    pub(super) fixed_layout: bool,
    pub(super) force_update: bool,
    pub(super) render_config: Option<RenderConfig>,
    pub(super) logger: Option<Logger>,
}

impl GridLayout {
    pub fn new(id: impl Into<String>, rows: usize, columns: usize) -> Self {
        Self::with_grid(id, Grid::new(rows, columns))
    }

    pub fn with_grid(id: impl Into<String>, grid: Grid) -> Self {
        Self {
            id: id.into(),
            grid,
            margins: Sides::uniform(DEFAULT_CONTENTS_MARGIN),
            nested: false,
            fixed_layout: true,
            force_update: false,
            render_config: None,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the model. Changes are not propagated; call
    /// [`GridLayout::item_resized`] or re-render as appropriate.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        item: LayoutItem,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> std::result::Result<(), GridError> {
        self.grid
            .set_cell(row, col, item, row_span, col_span, alignment)
    }

    pub fn contents_margins(&self) -> Sides {
        self.margins
    }

    pub fn set_contents_margins(&mut self, margins: Sides) {
        self.margins = margins;
    }

    /// Margins actually rendered; nested layouts leave them to their parent.
    pub fn effective_margins(&self) -> Sides {
        if self.nested {
            Sides::default()
        } else {
            self.margins
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub(crate) fn set_nested(&mut self, nested: bool) {
        self.nested = nested;
    }

    pub fn is_fixed_layout(&self) -> bool {
        self.fixed_layout
    }

    /// Apply a rendering hint. Only `table-layout` (`fixed` or `auto`) is
    /// understood; anything else is logged and ignored.
    pub fn set_hint(&mut self, name: &str, value: &str) {
        match (name, value) {
            ("table-layout", "fixed") => self.fixed_layout = true,
            ("table-layout", "auto") => self.fixed_layout = false,
            ("table-layout", _) => emit(
                self.logger.as_ref(),
                LogLevel::Error,
                LOG_TARGET,
                "unrecognized hint value",
                [json_str("hint", name), json_str("value", value)],
            ),
            _ => emit(
                self.logger.as_ref(),
                LogLevel::Error,
                LOG_TARGET,
                "unrecognized hint",
                [json_str("hint", name)],
            ),
        }
    }

    pub fn minimum_height(&self) -> i32 {
        minimum::minimum_height(&self.grid)
    }

    pub fn minimum_width(&self) -> i32 {
        minimum::minimum_width(&self.grid)
    }

    /// Signal that the item with `key` changed size.
    ///
    /// Only items in a non-stretching row affect the client layout; for those
    /// the layout is marked for a client adjust and `true` is returned.
    pub fn item_resized(&mut self, key: &str) -> bool {
        let Some((row, _)) = self.grid.find(key) else {
            return false;
        };
        if self.grid.row(row).stretch <= 0 {
            self.force_update = true;
            true
        } else {
            false
        }
    }

    pub fn needs_update(&self) -> bool {
        self.force_update
    }

    /// Queue a client adjust for this layout if an item resize asked for one.
    pub fn update_dom(&mut self, session: &mut Session) {
        if self.force_update {
            self.force_update = false;
            session.do_javascript(Statement::AdjustLayouts(Some(self.id.clone())));
        }
    }

    /// Config produced by the last fit-height render.
    pub fn render_config(&self) -> Option<&RenderConfig> {
        self.render_config.as_ref()
    }

    pub(super) fn build_render_config(&self) -> RenderConfig {
        RenderConfig::for_grid(self.id.clone(), &self.grid, self.effective_margins())
    }

    pub(super) fn store_render_config(&mut self, config: RenderConfig) {
        self.render_config = Some(config);
    }

    /// Render and hand back the session's pending client statements.
    pub fn render_page(
        &mut self,
        session: &mut Session,
    ) -> Result<(DomElement, Vec<Statement>)> {
        let dom = self.create_dom(true, true, session)?;
        Ok((dom, session.take_statements()))
    }
}
