//! Word clouds with a lazily loaded layout library
//!
//! The layout algorithm is resolved by URL through a [`LibraryLoader`] shared
//! by every word cloud of a dashboard. Each URL is loaded at most once; callers
//! that arrive while a load is in flight wait on the same cell, and a load that
//! exceeds the configured timeout fails with [`LibraryError::Timeout`].

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use async_trait::async_trait;
use dash_core::{ChartHandle, ChartKey, WordCloudData, WordGroup};
use dash_ui::chart_widget_id;
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Ui, Vec2};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use super::utils::colors;
use crate::chart_view::{ChartAction, ChartView};

const CANVAS_HEIGHT: f32 = 280.0;
const MAX_PLACEMENT_STEPS: usize = 4_000;

/// Failure to obtain a layout library; shared by every waiter on the same URL
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LibraryError {
    #[error("Loading layout library {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Layout library {url} is not available")]
    Unavailable { url: String },

    #[error("Layout library {url} failed to load: {reason}")]
    Failed { url: String, reason: String },
}

pub type LoadResult = Result<Arc<dyn WordLayout>, LibraryError>;

/// A word with its resolved font size
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWord {
    pub text: String,
    pub size: f32,
}

/// A word placed in canvas coordinates relative to the canvas origin
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub size: f32,
    pub rect: Rect,
}

/// A word placement algorithm
pub trait WordLayout: Send + Sync {
    fn name(&self) -> &str;

    /// Place words (largest first) inside `area`; words that do not fit are skipped
    fn layout(&self, words: &[WeightedWord], area: Vec2, measure: &dyn Fn(&str, f32) -> Vec2) -> Vec<PlacedWord>;
}

/// Resolves a library URL to a layout implementation
#[async_trait]
pub trait LayoutProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> LoadResult;
}

/// Path a spiral layout walks outward from the center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spiral {
    Archimedean,
    Rectangular,
}

/// Spiral placement: each word walks outward from the center until its box
/// fits without overlapping earlier words
#[derive(Debug, Clone)]
pub struct SpiralLayout {
    spiral: Spiral,
    padding: f32,
}

impl SpiralLayout {
    pub fn new(spiral: Spiral) -> Self {
        Self { spiral, padding: 2.0 }
    }

    /// Offsets from the center in walk order
    fn offsets(&self, area: Vec2) -> Vec<Vec2> {
        let aspect = if area.y > 0.0 { area.x / area.y } else { 1.0 };
        let mut offsets = Vec::with_capacity(MAX_PLACEMENT_STEPS);
        offsets.push(Vec2::ZERO);

        match self.spiral {
            Spiral::Archimedean => {
                for step in 1..MAX_PLACEMENT_STEPS {
                    let t = step as f32 * 0.1;
                    offsets.push(vec2(aspect * t * t.cos(), t * t.sin()));
                }
            }
            Spiral::Rectangular => {
                let dy = 4.0;
                let dx = dy * aspect;
                let (mut x, mut y) = (0.0_f32, 0.0_f32);
                for step in 1..MAX_PLACEMENT_STEPS {
                    match ((1.0 + 4.0 * step as f32).sqrt() - 1.0) as usize & 3 {
                        0 => x += dx,
                        1 => y += dy,
                        2 => x -= dx,
                        _ => y -= dy,
                    }
                    offsets.push(vec2(x, y));
                }
            }
        }
        offsets
    }
}

impl WordLayout for SpiralLayout {
    fn name(&self) -> &str {
        match self.spiral {
            Spiral::Archimedean => "spiral",
            Spiral::Rectangular => "rectangular",
        }
    }

    fn layout(&self, words: &[WeightedWord], area: Vec2, measure: &dyn Fn(&str, f32) -> Vec2) -> Vec<PlacedWord> {
        let bounds = Rect::from_min_size(pos2(0.0, 0.0), area);
        let center = bounds.center();
        let offsets = self.offsets(area);

        let mut ordered: Vec<&WeightedWord> = words.iter().collect();
        ordered.sort_by(|a, b| b.size.total_cmp(&a.size));

        let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());
        for word in ordered {
            let size = measure(&word.text, word.size) + Vec2::splat(self.padding);
            let spot = offsets.iter().find_map(|offset| {
                let rect = Rect::from_center_size(center + *offset, size);
                let free = bounds.contains_rect(rect) && placed.iter().all(|p| !p.rect.intersects(rect));
                free.then_some(rect)
            });
            if let Some(rect) = spot {
                placed.push(PlacedWord {
                    text: word.text.clone(),
                    size: word.size,
                    rect,
                });
            }
        }
        placed
    }
}

/// Prefix of layout URLs served from this crate
pub const BUILTIN_SCHEME: &str = "builtin:";

/// Serves `builtin:spiral` and `builtin:rectangular`
#[derive(Debug, Default)]
pub struct BuiltinLayouts;

#[async_trait]
impl LayoutProvider for BuiltinLayouts {
    async fn fetch(&self, url: &str) -> LoadResult {
        match url.strip_prefix(BUILTIN_SCHEME) {
            Some("spiral") | Some("archimedean") => Ok(Arc::new(SpiralLayout::new(Spiral::Archimedean))),
            Some("rectangular") => Ok(Arc::new(SpiralLayout::new(Spiral::Rectangular))),
            _ => Err(LibraryError::Unavailable { url: url.to_string() }),
        }
    }
}

/// Loads each layout library URL at most once.
///
/// Results, failures included, are cached per URL for the loader's lifetime.
pub struct LibraryLoader {
    provider: Arc<dyn LayoutProvider>,
    timeout: Duration,
    cells: Mutex<AHashMap<String, Arc<OnceCell<LoadResult>>>>,
}

impl LibraryLoader {
    pub fn new(provider: Arc<dyn LayoutProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cells: Mutex::new(AHashMap::new()),
        }
    }

    pub fn builtin(timeout: Duration) -> Self {
        Self::new(Arc::new(BuiltinLayouts), timeout)
    }

    pub async fn load(&self, url: &str) -> LoadResult {
        let cell = {
            let mut cells = self.cells.lock();
            cells.entry(url.to_string()).or_default().clone()
        };

        cell.get_or_init(|| async {
            tracing::info!("Loading word cloud layout from {}", url);
            let result = match tokio::time::timeout(self.timeout, self.provider.fetch(url)).await {
                Ok(result) => result,
                Err(_) => Err(LibraryError::Timeout {
                    url: url.to_string(),
                    after: self.timeout,
                }),
            };
            if let Err(e) = &result {
                tracing::warn!("{}", e);
            }
            result
        })
        .await
        .clone()
    }

    /// Result of a finished load, if any
    pub fn loaded(&self, url: &str) -> Option<LoadResult> {
        let cells = self.cells.lock();
        cells.get(url).and_then(|cell| cell.get().cloned())
    }
}

/// Font size for a weight: linear position in the weight range, eased with
/// `t^0.8`, mapped onto `[min_size, max_size]`
pub fn font_size_for_weight(weight: f64, min_weight: f64, max_weight: f64, min_size: f32, max_size: f32) -> f32 {
    let t = if max_weight > min_weight {
        ((weight - min_weight) / (max_weight - min_weight)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let eased = t.powf(0.8) as f32;
    min_size + eased * (max_size - min_size)
}

/// `(min, max)` font size for a canvas
pub fn size_range_for(area: Vec2) -> (f32, f32) {
    let base = area.x.min(area.y * 2.0).max(0.0);
    let min = (base * 0.025).max(10.0);
    let max = (base * 0.11).max(min + 8.0);
    (min, max)
}

/// Which list of a group is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextSource {
    #[default]
    Response,
    Thinking,
}

/// Assistant groups carry both a response and a thinking list
pub fn shows_source_toggle(group_id: &str) -> bool {
    group_id.starts_with("assistant")
}

fn weighted_words(words: &[(String, f64)], area: Vec2) -> Vec<WeightedWord> {
    let (min_size, max_size) = size_range_for(area);
    let min_weight = words.iter().map(|(_, w)| *w).fold(f64::INFINITY, f64::min);
    let max_weight = words.iter().map(|(_, w)| *w).fold(f64::NEG_INFINITY, f64::max);
    words
        .iter()
        .map(|(text, weight)| WeightedWord {
            text: text.clone(),
            size: font_size_for_weight(*weight, min_weight, max_weight, min_size, max_size),
        })
        .collect()
}

/// Inputs the current placement was computed from
#[derive(Debug, Clone, PartialEq)]
struct PlacementKey {
    group: Option<String>,
    source: TextSource,
}

/// Word cloud chart view
pub struct WordCloudView {
    key: ChartKey,
    title: String,
    data: WordCloudData,
    groups: Vec<WordGroup>,
    group: Option<String>,
    source: TextSource,
    url: String,
    slot: Arc<Mutex<Option<LoadResult>>>,
    library: Option<LoadResult>,
    task: Option<JoinHandle<()>>,
    placed: Vec<PlacedWord>,
    placed_for: Option<PlacementKey>,
    /// Canvas size the placement is laid out in; refreshed only on resize
    layout_area: Option<Vec2>,
}

impl WordCloudView {
    /// Build the view and start loading the layout library on `runtime`
    pub fn new(
        key: ChartKey,
        title: String,
        data: WordCloudData,
        loader: &Arc<LibraryLoader>,
        url: &str,
        runtime: &tokio::runtime::Handle,
    ) -> Self {
        let slot: Arc<Mutex<Option<LoadResult>>> = Arc::new(Mutex::new(None));

        // Skip the task when another cloud already loaded this URL
        let library = loader.loaded(url);
        let task = if library.is_none() {
            let loader = Arc::clone(loader);
            let slot = Arc::clone(&slot);
            let url = url.to_string();
            Some(runtime.spawn(async move {
                let result = loader.load(&url).await;
                *slot.lock() = Some(result);
            }))
        } else {
            None
        };

        Self {
            key,
            title,
            groups: data.effective_groups(),
            group: data.initial_group(),
            data,
            source: TextSource::Response,
            url: url.to_string(),
            slot,
            library,
            task,
            placed: Vec::new(),
            placed_for: None,
            layout_area: None,
        }
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn source(&self) -> TextSource {
        self.source
    }

    /// Words of the selected group and source
    pub fn current_words(&self) -> &[(String, f64)] {
        let Some(list) = self.group.as_ref().and_then(|g| self.data.word_lists.get(g)) else {
            return &[];
        };
        match self.source {
            TextSource::Response => &list.response,
            TextSource::Thinking => &list.thinking,
        }
    }

    pub fn select_group(&mut self, group_id: &str) {
        if self.group.as_deref() == Some(group_id) {
            return;
        }
        self.group = Some(group_id.to_string());
        if !shows_source_toggle(group_id) {
            self.source = TextSource::Response;
        }
        self.placed_for = None;
    }

    pub fn set_source(&mut self, source: TextSource) {
        if self.source != source {
            self.source = source;
            self.placed_for = None;
        }
    }

    fn poll_library(&mut self) {
        if self.library.is_none() {
            if let Some(result) = self.slot.lock().take() {
                self.library = Some(result);
                self.task = None;
            }
        }
    }

    /// Place the current words, reusing the last placement when nothing changed.
    ///
    /// `area` is only read when no canvas size is held yet, which is on the
    /// first layout and after [`ChartView::on_resize`].
    pub fn relayout(&mut self, layout: &dyn WordLayout, area: Vec2, measure: &dyn Fn(&str, f32) -> Vec2) -> &[PlacedWord] {
        let area = *self.layout_area.get_or_insert(area);
        let key = PlacementKey {
            group: self.group.clone(),
            source: self.source,
        };
        if self.placed_for.as_ref() != Some(&key) {
            let words = weighted_words(self.current_words(), area);
            self.placed = layout.layout(&words, area, measure);
            tracing::debug!(
                "Word cloud {} placed {} of {} words with {}",
                self.key,
                self.placed.len(),
                words.len(),
                layout.name()
            );
            self.placed_for = Some(key);
        }
        &self.placed
    }

    fn controls_ui(&mut self, ui: &mut Ui) {
        let mut selected = None;
        let mut source = self.source;

        ui.horizontal(|ui| {
            if self.groups.len() > 1 {
                let current = self
                    .groups
                    .iter()
                    .find(|g| Some(&g.id) == self.group.as_ref())
                    .map(|g| if g.label.is_empty() { g.id.as_str() } else { g.label.as_str() })
                    .unwrap_or("Select group");
                egui::ComboBox::from_id_source(chart_widget_id(&self.key, "group"))
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for group in &self.groups {
                            let label = if group.label.is_empty() { &group.id } else { &group.label };
                            if ui.selectable_label(self.group.as_ref() == Some(&group.id), label).clicked() {
                                selected = Some(group.id.clone());
                            }
                        }
                    });
            }

            if self.group.as_deref().map_or(false, shows_source_toggle) {
                ui.selectable_value(&mut source, TextSource::Response, "Response");
                ui.selectable_value(&mut source, TextSource::Thinking, "Thinking");
            }
        });

        if let Some(group) = selected {
            self.select_group(&group);
        }
        self.set_source(source);
    }
}

impl ChartHandle for WordCloudView {
    fn destroy(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.placed.clear();
        self.placed_for = None;
    }
}

impl ChartView for WordCloudView {
    fn key(&self) -> &ChartKey {
        &self.key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ChartAction>) {
        self.poll_library();
        self.controls_ui(ui);

        let (response, painter) = ui.allocate_painter(vec2(ui.available_width(), CANVAS_HEIGHT), Sense::hover());
        let rect = response.rect;

        let layout = match &self.library {
            None => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Loading word cloud…",
                    FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
                ui.ctx().request_repaint_after(Duration::from_millis(50));
                return;
            }
            Some(Err(e)) => {
                tracing::debug!("Word cloud {} falls back to text: {}", self.key, e);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Word cloud unavailable",
                    FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
                return;
            }
            Some(Ok(layout)) => Arc::clone(layout),
        };

        if self.current_words().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No words for this selection",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let fonts = ui.ctx().clone();
        let measure = |text: &str, size: f32| {
            fonts.fonts(|f| {
                f.layout_no_wrap(text.to_string(), FontId::proportional(size), Color32::WHITE)
                    .size()
            })
        };
        let placed = self.relayout(layout.as_ref(), rect.size(), &measure);

        for (i, word) in placed.iter().enumerate() {
            painter.text(
                rect.min + word.rect.center().to_vec2(),
                Align2::CENTER_CENTER,
                &word.text,
                FontId::proportional(word.size),
                colors::categorical_color(i),
            );
        }
    }

    fn on_resize(&mut self) {
        self.layout_area = None;
        self.placed_for = None;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Drop for WordCloudView {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
