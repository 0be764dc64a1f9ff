use crate::AnnotateApp;
use crate::app::Family;
use crate::tools::GestureState;

pub fn tools_panel(app: &mut AnnotateApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.active_family();
            for family in Family::ALL {
                let count = app
                    .workspace()
                    .and_then(|workspace| workspace.tool(family))
                    .map_or(0, |tool| tool.len());
                let label = format!("{} ({count})", family.label());
                if ui.selectable_label(active == family, label).clicked() && active != family {
                    log::info!("Tool selected from UI: {}", family.label());
                    app.set_active_family(family);
                }
            }
            ui.separator();

            let Some(workspace) = app.workspace_mut() else {
                return;
            };

            let mut pan = workspace.canvas().borrow().pan_mode();
            if ui.checkbox(&mut pan, "Pan").changed() {
                workspace.canvas().borrow_mut().set_pan_mode(pan);
            }

            ui.horizontal(|ui| {
                if let Some(tool) = workspace.tool_mut(active) {
                    if ui.button("Clear").clicked() {
                        tool.clear();
                    }
                    if ui.button("Reset").clicked() {
                        tool.reset();
                    }
                    let frozen = !tool.is_active();
                    if ui.button(if frozen { "Start" } else { "Freeze" }).clicked() {
                        if frozen {
                            tool.start();
                        } else {
                            tool.freeze();
                        }
                    }
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Clear all").clicked() {
                    workspace.clear_all();
                }
                if ui.button("Reset all").clicked() {
                    workspace.reset_all();
                }
            });

            ui.separator();
            if let Some(tool) = workspace.tool(active) {
                let state = match tool.gesture_state() {
                    GestureState::Idle => "idle",
                    GestureState::Spawning => "spawning",
                    GestureState::VertexDrag => "moving vertex",
                    GestureState::ShapeDrag => "dragging",
                };
                ui.label(format!("{}: {state}", tool.name()));
            }
            ui.label("Left click: place vertices or grab a handle");
            ui.label("Right drag: move a shape");
            ui.label("Middle or Ctrl click: remove a shape");
        });
}
