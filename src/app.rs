use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::element::{Element, Ellipse, HSpan, Line, Point, Polygon, Rectangle, VSpan};
use crate::error::ToolError;
use crate::input::{self, InputHandler};
use crate::panels;
use crate::renderer::PlotCanvas;
use crate::style::StyleOptions;
use crate::surface::SurfaceHandle;
use crate::tools::{AnnotationTool, Tool, ToolConfig};

/// The shape family the next spawn click creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Family {
    #[default]
    Points,
    Lines,
    Rectangles,
    Ellipses,
    Polygons,
    Hspans,
    Vspans,
}

impl Family {
    pub const ALL: [Self; 7] = [
        Self::Points,
        Self::Lines,
        Self::Rectangles,
        Self::Ellipses,
        Self::Polygons,
        Self::Hspans,
        Self::Vspans,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Lines => "Lines",
            Self::Rectangles => "Rectangles",
            Self::Ellipses => "Ellipses",
            Self::Polygons => "Polygons",
            Self::Hspans => "Horizontal spans",
            Self::Vspans => "Vertical spans",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One canvas and one tool per family, all sharing the canvas arbiter
pub struct Workspace {
    canvas: Rc<RefCell<PlotCanvas>>,
    tools: Vec<Box<dyn AnnotationTool>>,
    input: InputHandler,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Workspace {
    pub fn new(config: &ToolConfig, active: Family) -> Result<Self, ToolError> {
        let canvas = Rc::new(RefCell::new(PlotCanvas::default()));
        let surface: SurfaceHandle = canvas.clone();
        let config = ToolConfig {
            autostart: false,
            ..config.clone()
        };

        // Order follows Family::ALL
        let tools: Vec<Box<dyn AnnotationTool>> = vec![
            create_tool::<Point>(&surface, &config)?,
            create_tool::<Line>(&surface, &config)?,
            create_tool::<Rectangle>(&surface, &config)?,
            create_tool::<Ellipse>(&surface, &config)?,
            create_tool::<Polygon>(&surface, &config)?,
            create_tool::<HSpan>(&surface, &config)?,
            create_tool::<VSpan>(&surface, &config)?,
        ];

        let mut workspace = Self {
            canvas,
            tools,
            input: InputHandler::new(),
        };
        workspace.activate(active);
        Ok(workspace)
    }

    pub fn canvas(&self) -> &Rc<RefCell<PlotCanvas>> {
        &self.canvas
    }

    pub fn tool(&self, family: Family) -> Option<&dyn AnnotationTool> {
        self.tools.get(family.index()).map(|tool| tool.as_ref())
    }

    pub fn tool_mut(&mut self, family: Family) -> Option<&mut (dyn AnnotationTool + 'static)> {
        self.tools.get_mut(family.index()).map(|tool| tool.as_mut())
    }

    /// Start `family`'s tool and stop the others. Stopped tools still let
    /// their shapes be edited and removed.
    pub fn activate(&mut self, family: Family) {
        for (i, tool) in self.tools.iter_mut().enumerate() {
            if i == family.index() {
                tool.start();
            } else if tool.is_active() {
                tool.stop();
            }
        }
        info!("Active tool: {}", family.label());
    }

    pub fn clear_all(&mut self) {
        for tool in &mut self.tools {
            tool.clear();
        }
    }

    pub fn reset_all(&mut self) {
        for tool in &mut self.tools {
            tool.reset();
        }
    }

    /// Feed this frame's pointer input over `plot_rect` to every tool
    pub fn handle_input(&mut self, ctx: &egui::Context, plot_rect: egui::Rect) {
        let events = {
            let canvas = self.canvas.borrow();
            self.input
                .process_input(ctx, plot_rect, |pos| canvas.screen_to_data(pos))
        };
        if events.is_empty() {
            return;
        }

        let surface: SurfaceHandle = self.canvas.clone();
        let mut tools: Vec<&mut dyn AnnotationTool> = self
            .tools
            .iter_mut()
            .map(|tool| &mut **tool as &mut dyn AnnotationTool)
            .collect();
        for event in &events {
            input::route_event(event, &surface, &mut tools);
        }
    }
}

/// Build one family's tool, stopped, with creation logging attached
fn create_tool<E: Element>(
    surface: &SurfaceHandle,
    config: &ToolConfig,
) -> Result<Box<dyn AnnotationTool>, ToolError> {
    let tool = Tool::<E>::with_config(
        surface.clone(),
        config.clone(),
        StyleOptions::default(),
        E::Options::default(),
    )?;
    tool.on_create(|event| info!("Created {} {}", E::KIND, event.shape.id()));
    tool.on_remove(|event| info!("Removed {} {}", E::KIND, event.shape.id()));
    Ok(Box::new(tool))
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AnnotateApp {
    active: Family,
    config: ToolConfig,
    // Shapes are session-only
    #[serde(skip)]
    workspace: Option<Workspace>,
}

impl AnnotateApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.workspace = match Workspace::new(&app.config, app.active) {
            Ok(workspace) => Some(workspace),
            Err(err) => {
                error!("Failed to set up annotation tools: {err}");
                None
            }
        };
        app
    }

    pub fn active_family(&self) -> Family {
        self.active
    }

    pub fn set_active_family(&mut self, family: Family) {
        self.active = family;
        if let Some(workspace) = &mut self.workspace {
            workspace.activate(family);
        }
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.workspace.as_mut()
    }
}

impl eframe::App for AnnotateApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
    }
}
