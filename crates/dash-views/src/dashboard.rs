//! Dashboard orchestration
//!
//! A [`Dashboard`] owns everything one rendered dashboard needs: the payload
//! fetch, the chart instance registry, per-table sort state and heatmap state.
//! A render fetches the payload on the tokio runtime; the UI thread picks the
//! result up in [`Dashboard::poll`] and rebuilds every view from it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dash_core::{
    ChartInstanceRegistry, ChartKey, ChartWidth, DashboardPayload, DashboardScope, Debouncer, Generation,
    GenerationCounter, SortStore, TableId,
};
use dash_data::{DashboardSource, DataError, RendererSettings};
use dash_ui::{card_frame, chart_widget_id, status_message, StatusKind};
use egui::Ui;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::chart_view::{ChartAction, ChartView};
use crate::dispatcher::build_view;
use crate::layout::{grid_rows, GridRow};
use crate::lists::ListView;
use crate::metrics::{metrics_row_ui, MetricCard};
use crate::plots::word_cloud::LibraryLoader;
use crate::BuildContext;

/// Shown when the payload could not be fetched
pub const FAILURE_MESSAGE: &str = "Failed to load dashboard data.";

/// Result of applying one fetched payload
#[derive(Debug)]
pub enum RenderOutcome {
    /// Charts were built and registered
    Rendered { charts: usize },
    /// The backend has no data for this dashboard yet
    Unavailable(DashboardPayload),
    /// The fetch failed; nothing was rendered
    Failed(String),
}

struct FetchResult {
    generation: Generation,
    result: Result<DashboardPayload, DataError>,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Loading,
    Failed(String),
    Unavailable(Option<String>),
    Ready,
}

/// A chart placed in the grid
#[derive(Debug, Clone)]
struct ChartSlot {
    key: ChartKey,
    width: ChartWidth,
    description: Option<String>,
}

/// One live dashboard
pub struct Dashboard {
    source: Arc<dyn DashboardSource>,
    runtime: tokio::runtime::Handle,
    settings: RendererSettings,
    library: Arc<LibraryLoader>,

    generations: GenerationCounter,
    inbox: Arc<Mutex<Option<FetchResult>>>,
    task: Option<JoinHandle<()>>,
    target: Option<(DashboardScope, String)>,
    /// Dashboard whose views are currently registered
    mounted: Option<String>,
    phase: Phase,

    sort_store: SortStore,
    registry: ChartInstanceRegistry<Box<dyn ChartView>>,

    title: Option<String>,
    metrics: Vec<MetricCard>,
    slots: Vec<ChartSlot>,
    grid: Vec<GridRow>,
    lists: Vec<ListView>,

    resize: Debouncer,
    last_width: Option<f32>,
    actions: Vec<ChartAction>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn DashboardSource>, runtime: tokio::runtime::Handle, settings: RendererSettings) -> Self {
        let library = Arc::new(LibraryLoader::builtin(settings.library_load_timeout));
        Self {
            source,
            runtime,
            library,
            resize: Debouncer::new(settings.resize_debounce),
            settings,
            generations: GenerationCounter::new(),
            inbox: Arc::new(Mutex::new(None)),
            task: None,
            target: None,
            mounted: None,
            phase: Phase::Idle,
            sort_store: SortStore::new(),
            registry: ChartInstanceRegistry::new(),
            title: None,
            metrics: Vec::new(),
            slots: Vec::new(),
            grid: Vec::new(),
            lists: Vec::new(),
            last_width: None,
            actions: Vec::new(),
        }
    }

    /// Share a layout library loader with other dashboards
    pub fn with_library(mut self, library: Arc<LibraryLoader>) -> Self {
        self.library = library;
        self
    }

    /// Start rendering a dashboard, superseding any render still in flight
    pub fn render(&mut self, scope: DashboardScope, dashboard_id: impl Into<String>) -> Generation {
        let dashboard_id = dashboard_id.into();
        let generation = self.generations.next();

        if let Some(task) = self.task.take() {
            tracing::debug!("Aborting superseded fetch");
            task.abort();
        }

        tracing::info!(
            "Rendering dashboard {} ({}) from {}",
            dashboard_id,
            scope,
            self.source.source_name()
        );

        let source = Arc::clone(&self.source);
        let inbox = Arc::clone(&self.inbox);
        let (fetch_scope, fetch_id) = (scope.clone(), dashboard_id.clone());
        self.task = Some(self.runtime.spawn(async move {
            let result = source.fetch(&fetch_scope, &fetch_id).await;
            *inbox.lock() = Some(FetchResult { generation, result });
        }));

        self.target = Some((scope, dashboard_id));
        self.phase = Phase::Loading;
        generation
    }

    /// Apply a finished fetch, if one is waiting.
    ///
    /// Results from superseded renders are dropped.
    pub fn poll(&mut self) -> Option<RenderOutcome> {
        let fetched = self.inbox.lock().take()?;
        if !self.generations.is_current(fetched.generation) {
            tracing::debug!("Discarding stale dashboard response (generation {})", fetched.generation.value());
            return None;
        }
        self.task = None;

        match fetched.result {
            Err(e) => {
                tracing::error!("Dashboard fetch failed: {}", e);
                self.clear_views();
                self.phase = Phase::Failed(e.to_string());
                Some(RenderOutcome::Failed(e.to_string()))
            }
            Ok(payload) if !payload.is_available => {
                tracing::info!(
                    "Dashboard unavailable: {}",
                    payload.message.as_deref().unwrap_or("no message")
                );
                self.clear_views();
                self.phase = Phase::Unavailable(payload.message.clone());
                Some(RenderOutcome::Unavailable(payload))
            }
            Ok(payload) => {
                let charts = self.apply(&payload);
                Some(RenderOutcome::Rendered { charts })
            }
        }
    }

    fn clear_views(&mut self) {
        if let Some(dashboard_id) = self.mounted.take() {
            self.registry.destroy_dashboard(&dashboard_id);
        }
        self.title = None;
        self.metrics.clear();
        self.slots.clear();
        self.grid.clear();
        self.lists.clear();
    }

    /// Rebuild every view from a payload, returning the number of charts built
    fn apply(&mut self, payload: &DashboardPayload) -> usize {
        self.clear_views();
        let dashboard_id = match &self.target {
            Some((_, id)) => id.clone(),
            None => return 0,
        };
        self.registry.destroy_dashboard(&dashboard_id);

        let config = &payload.config;
        let data = &payload.data;

        self.title = config
            .dashboard
            .as_ref()
            .map(|meta| meta.name.clone())
            .filter(|name| !name.is_empty());
        self.metrics = config
            .metrics
            .iter()
            .map(|metric| MetricCard::build(metric, &data.metrics))
            .collect();

        let mut ctx = BuildContext {
            dashboard_id: &dashboard_id,
            sort_store: &mut self.sort_store,
            library: &self.library,
            runtime: &self.runtime,
            settings: &self.settings,
        };

        for chart in &config.charts {
            let Some(chart_data) = data.chart(&chart.id) else {
                tracing::debug!("Skipping chart {} without data", chart.id);
                continue;
            };
            let Some(view) = build_view(chart, chart_data, &mut ctx) else {
                tracing::debug!("Skipping chart {} with unusable data", chart.id);
                continue;
            };

            let key = view.key().clone();
            self.registry.register(&key, view);
            self.slots.push(ChartSlot {
                key,
                width: chart.width,
                description: chart.description().map(str::to_string),
            });
        }

        self.mounted = Some(dashboard_id.clone());

        let widths: Vec<ChartWidth> = self.slots.iter().map(|s| s.width).collect();
        self.grid = grid_rows(&widths);

        self.lists = config
            .lists
            .iter()
            .filter_map(|list| data.list(&list.id).map(|d| ListView::build(list, d.rows())))
            .filter(|list| !list.items.is_empty())
            .collect();

        self.phase = Phase::Ready;
        tracing::info!(
            "Dashboard {} rendered {} of {} chart(s)",
            dashboard_id,
            self.slots.len(),
            config.charts.len()
        );
        self.slots.len()
    }

    /// Flip a table's sort direction and render the whole dashboard again
    pub fn toggle_sort(&mut self, table: &TableId) -> Option<Generation> {
        self.sort_store.toggle(table)?;
        let (scope, dashboard_id) = self.target.clone()?;
        Some(self.render(scope, dashboard_id))
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn dashboard_id(&self) -> Option<&str> {
        self.target.as_ref().map(|(_, id)| id.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn chart(&self, key: &ChartKey) -> Option<&dyn ChartView> {
        self.registry.get(key).map(|view| view.as_ref())
    }

    pub fn chart_count(&self) -> usize {
        self.registry.len()
    }

    pub fn sort_store(&self) -> &SortStore {
        &self.sort_store
    }

    /// Track the container width and notify views once resizing settles
    fn track_resize(&mut self, ui: &Ui) {
        let now = Instant::now();
        let width = ui.available_width();
        if self.last_width.map_or(false, |last| (last - width).abs() > 0.5) {
            self.resize.trigger(now);
        }
        self.last_width = Some(width);

        if self.resize.poll(now) {
            tracing::debug!("Resize settled at {:.0}px", width);
            for (_, view) in self.registry.iter_mut() {
                view.on_resize();
            }
        } else if let Some(remaining) = self.resize.remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }

    /// Draw the dashboard and apply any finished fetch or raised action
    pub fn ui(&mut self, ui: &mut Ui) -> Option<RenderOutcome> {
        let outcome = self.poll();
        self.track_resize(ui);

        let phase = self.phase.clone();
        match &phase {
            Phase::Idle => {}
            Phase::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading dashboard…");
                });
                ui.ctx().request_repaint_after(Duration::from_millis(50));
            }
            Phase::Failed(_) => status_message(ui, StatusKind::Error, FAILURE_MESSAGE),
            Phase::Unavailable(message) => status_message(
                ui,
                StatusKind::Info,
                message.as_deref().unwrap_or("This dashboard has no data yet."),
            ),
            Phase::Ready => self.dashboard_ui(ui),
        }

        for action in std::mem::take(&mut self.actions) {
            match action {
                ChartAction::ToggleSort(table) => {
                    self.toggle_sort(&table);
                }
            }
        }

        outcome
    }

    fn dashboard_ui(&mut self, ui: &mut Ui) {
        let scroll_id = match &self.target {
            Some((_, id)) => chart_widget_id(&ChartKey::new(id.as_str(), ""), "scroll"),
            None => ui.id().with("dashboard_scroll"),
        };

        egui::ScrollArea::vertical()
            .id_source(scroll_id)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                metrics_row_ui(ui, &self.metrics);
                ui.add_space(8.0);

                for row in &self.grid {
                    match *row {
                        GridRow::Full(i) => {
                            chart_card(ui, &mut self.registry, &self.slots[i], &mut self.actions);
                        }
                        GridRow::Pair(left, right) => {
                            ui.columns(2, |columns| {
                                chart_card(&mut columns[0], &mut self.registry, &self.slots[left], &mut self.actions);
                                if let Some(right) = right {
                                    chart_card(
                                        &mut columns[1],
                                        &mut self.registry,
                                        &self.slots[right],
                                        &mut self.actions,
                                    );
                                }
                            });
                        }
                    }
                    ui.add_space(8.0);
                }

                for list in &self.lists {
                    list.ui(ui);
                    ui.add_space(8.0);
                }
            });
    }
}

fn chart_card(
    ui: &mut Ui,
    registry: &mut ChartInstanceRegistry<Box<dyn ChartView>>,
    slot: &ChartSlot,
    actions: &mut Vec<ChartAction>,
) {
    let Some(view) = registry.get_mut(&slot.key) else {
        return;
    };
    card_frame(ui).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if !view.title().is_empty() {
            ui.strong(view.title());
        }
        if let Some(description) = &slot.description {
            ui.weak(description);
        }
        ui.add_space(4.0);
        ui.push_id(chart_widget_id(&slot.key, "card"), |ui| view.ui(ui, actions));
    });
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
