use crate::AnnotateApp;

pub fn central_panel(app: &mut AnnotateApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(workspace) = app.workspace_mut() else {
            ui.label("Annotation tools failed to start, see the log.");
            return;
        };

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let plot_rect = response.rect.shrink(24.0);
        let canvas = workspace.canvas().clone();

        {
            let mut canvas = canvas.borrow_mut();
            canvas.set_screen_rect(plot_rect);
            if canvas.pan_mode() && response.dragged_by(egui::PointerButton::Primary) {
                canvas.pan_by_screen(response.drag_delta());
            }
        }

        // Tools ignore spawn clicks and picks while pan mode is on
        workspace.handle_input(ctx, plot_rect);

        let mut canvas = canvas.borrow_mut();
        canvas.paint(&painter);
        if canvas.take_redraw_request() {
            ctx.request_repaint();
        }
    });
}
