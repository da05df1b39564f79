use egui::{Context, TopBottomPanel};

/// Editable dashboard selection shown in the top bar
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub scope: String,
    pub dashboard_id: String,
    /// Title of the rendered dashboard, if any
    pub title: Option<String>,
    pub loading: bool,
}

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    None,
    Render { scope: String, dashboard_id: String },
}

/// Render the top bar
pub fn top_bar(ctx: &Context, state: &mut ShellState) -> ShellAction {
    let mut action = ShellAction::None;

    TopBottomPanel::top("dashboard_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(crate::icons::DASHBOARD);
            match &state.title {
                Some(title) => ui.strong(title),
                None => ui.weak("No dashboard"),
            };

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let reload = ui
                    .add_enabled(!state.loading, egui::Button::new(crate::icons::RELOAD))
                    .on_hover_text("Render dashboard");

                let dashboard = ui.add(egui::TextEdit::singleline(&mut state.dashboard_id).desired_width(140.0));
                ui.label("Dashboard");
                let scope = ui.add(egui::TextEdit::singleline(&mut state.scope).desired_width(140.0));
                ui.label("Scope");

                let submitted = (dashboard.lost_focus() || scope.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if reload.clicked() || submitted {
                    action = ShellAction::Render {
                        scope: state.scope.trim().to_string(),
                        dashboard_id: state.dashboard_id.trim().to_string(),
                    };
                }

                if state.loading {
                    ui.spinner();
                }
            });
        });
    });

    action
}
