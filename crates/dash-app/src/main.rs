//! Main application entry point

use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dash_core::DashboardScope;
use dash_data::{DashboardSource, FileDashboardSource, HttpDashboardSource, RendererSettings};
use dash_ui::{apply_theme, status_message, top_bar, ShellAction, ShellState, StatusKind, Theme};
use dash_views::{Dashboard, RenderOutcome};

/// Main application state
struct DashboardApp {
    /// The dashboard being shown
    dashboard: Dashboard,

    /// Scope and id edited in the top bar
    shell: ShellState,

    /// Last problem with the shell input, shown above the dashboard
    input_error: Option<String>,

    /// Tokio runtime; dropped after the dashboard so in-flight fetches abort first
    _runtime: tokio::runtime::Runtime,
}

impl DashboardApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        settings: RendererSettings,
        source: Arc<dyn DashboardSource>,
        runtime: tokio::runtime::Runtime,
    ) -> Result<Self> {
        apply_theme(&cc.egui_ctx, &Theme::default());

        let scope = settings.dashboard_scope()?;
        let shell = ShellState {
            scope: settings.scope.clone(),
            dashboard_id: settings.dashboard_id.clone(),
            title: None,
            loading: true,
        };
        let dashboard_id = settings.dashboard_id.clone();

        let mut dashboard = Dashboard::new(source, runtime.handle().clone(), settings);
        dashboard.render(scope, dashboard_id);

        Ok(Self {
            dashboard,
            shell,
            input_error: None,
            _runtime: runtime,
        })
    }

    fn handle_shell(&mut self, action: ShellAction) {
        let ShellAction::Render { scope, dashboard_id } = action else {
            return;
        };
        if dashboard_id.is_empty() {
            self.input_error = Some("Enter a dashboard id.".to_string());
            return;
        }
        match scope.parse::<DashboardScope>() {
            Ok(scope) => {
                self.input_error = None;
                self.dashboard.render(scope, dashboard_id);
            }
            Err(e) => {
                warn!("Rejected scope {:?}: {}", scope, e);
                self.input_error = Some(e);
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.shell.loading = self.dashboard.is_loading();
        let action = top_bar(ctx, &mut self.shell);
        self.handle_shell(action);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.input_error {
                status_message(ui, StatusKind::Warning, message);
                ui.add_space(8.0);
            }

            match self.dashboard.ui(ui) {
                Some(RenderOutcome::Rendered { charts }) => {
                    info!("Rendered {} chart(s)", charts);
                }
                Some(RenderOutcome::Unavailable(payload)) => {
                    info!("Dashboard unavailable: {:?}", payload.message);
                }
                Some(RenderOutcome::Failed(message)) => {
                    error!("Dashboard failed: {}", message);
                }
                None => {}
            }
        });

        self.shell.title = self.dashboard.title().map(str::to_string);
    }
}

fn build_source(settings: &RendererSettings) -> Result<Arc<dyn DashboardSource>> {
    Ok(match &settings.payload_dir {
        Some(dir) => {
            info!("Reading dashboard payloads from {}", dir.display());
            Arc::new(FileDashboardSource::new(dir))
        }
        None => {
            info!("Fetching dashboard payloads from {}", settings.base_url);
            Arc::new(HttpDashboardSource::new(&settings.base_url, settings.request_timeout)?)
        }
    })
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = RendererSettings::load()?;
    let source = build_source(&settings)?;
    let runtime = tokio::runtime::Runtime::new()?;

    info!(
        "Starting dashboard renderer for {} ({})",
        settings.dashboard_id, settings.scope
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard",
        options,
        Box::new(move |cc| -> Box<dyn eframe::App> {
            match DashboardApp::new(cc, settings, source, runtime) {
                Ok(app) => Box::new(app),
                Err(e) => {
                    error!("Startup failed: {}", e);
                    Box::new(StartupError(e.to_string()))
                }
            }
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

/// Shown instead of the dashboard when startup fails inside the window
struct StartupError(String);

impl eframe::App for StartupError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            status_message(ui, StatusKind::Error, &self.0);
        });
    }
}
