mod modals;

use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui;
use modals::Modals;

use super::{
    message_overlay::MessageOverlay,
    rating_modal::RatingModalAction,
    resources_table::{
        resources_panel,
        ResourceAction,
    },
    theme::{
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
    },
    world_map::{
        MapHandle,
        WorldMap,
    },
};
use crate::{
    controller::{
        ListStatus,
        PageRequest,
        ResourceListController,
    },
    core::{
        models::Stage,
        settings::AppSettings,
        tasks::{
            Services,
            TaskManager,
            TaskResult,
        },
        FloraError,
    },
    persistence::KeyValueStore,
    rating::{
        RatingFlow,
        RatingPhase,
        SubmitOutcome,
    },
};

const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct FloraApp {
    // Configuration
    settings: AppSettings,

    // Data
    stages: Vec<Stage>,
    controller: ResourceListController,
    rating: RatingFlow,
    map: MapHandle,

    // UI State
    theme: Theme,
    message_overlay: MessageOverlay,
    notice: Option<String>,
    modals: Modals,

    // Background work
    task_manager: TaskManager,
    pending_tasks: usize,
    last_sweep: Instant,
}

impl FloraApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, FloraError> {
        let task_manager = TaskManager::new(Services::new(&settings, store)?)?;

        let mut app = Self {
            controller: ResourceListController::new(settings.per_page),
            settings,
            stages: Vec::new(),
            rating: RatingFlow::new(),
            map: MapHandle::new(),
            theme: Theme::herbarium(),
            message_overlay: MessageOverlay::new(),
            notice: None,
            modals: Modals::default(),
            task_manager,
            pending_tasks: 0,
            last_sweep: Instant::now(),
        };

        app.setup_theme(cc);

        app.task_manager.sweep_cache();
        app.pending_tasks += 1;
        app.reload_stages();

        Ok(app)
    }

    fn setup_theme(&self, cc: &eframe::CreationContext<'_>) {
        set_theme(&cc.egui_ctx, &self.theme);
        cc.egui_ctx.set_theme(if self.settings.dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
    }

    fn reload_stages(&mut self) {
        self.message_overlay.set_message("Loading stages...");
        self.task_manager.load_stages();
        self.pending_tasks += 1;
    }

    fn start_page_load(&mut self, request: PageRequest) {
        tracing::info!(
            stage = %request.stage,
            country = ?request.country,
            page = request.page,
            "Loading resources"
        );
        self.task_manager.load_page(request);
        self.pending_tasks += 1;
    }

    fn request_page(&mut self, page: u32) {
        match self.controller.request_page(page) {
            Ok(Some(request)) => self.start_page_load(request),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Page request rejected: {}", e);
                self.modals.error.show_error("Invalid page", e.user_message(), None::<String>);
            }
        }
    }

    fn reload_current_page(&mut self) {
        let page = self.controller.pagination().page.max(1);
        self.request_page(page);
    }

    fn select_country(&mut self, country: Option<String>) {
        match &country {
            Some(code) => {
                self.map.focus(code);
            }
            None => self.map.clear(),
        }

        if let Some(request) = self.controller.change_country(self.map.selected_code()) {
            self.start_page_load(request);
        }
    }

    fn handle_top_bar(&mut self, action: TopBarAction) {
        match action {
            TopBarAction::SelectStage(stage) => {
                self.controller.select_stage(stage);
            }
            TopBarAction::SelectCountry(country) => self.select_country(country),
            TopBarAction::FindResources => self.request_page(1),
            TopBarAction::ReloadStages => self.reload_stages(),
            TopBarAction::ShowAbout => self.modals.about.open(),
        }
    }

    fn handle_resource_action(&mut self, action: ResourceAction) {
        match action {
            ResourceAction::Rate(target) => self.rating.open(target),
            ResourceAction::Reviews { organism_id, organism_name } => {
                self.modals.reviews.open_loading(&organism_name);
                self.task_manager.load_reviews(organism_id, organism_name);
                self.pending_tasks += 1;
            }
            ResourceAction::Structure(file_name) => {
                self.modals.structure.open_loading(&self.settings.asset_url, &file_name);
                self.task_manager.load_structure(file_name);
                self.pending_tasks += 1;
            }
            ResourceAction::Page(page) => self.request_page(page),
            ResourceAction::Retry => self.reload_current_page(),
        }
    }

    fn handle_rating_action(&mut self, action: RatingModalAction) {
        match action {
            RatingModalAction::Cancel => self.rating.cancel(),
            RatingModalAction::Submit => match self.rating.begin_submit() {
                Ok((organism_id, submission)) => {
                    self.task_manager.submit_rating(organism_id, submission);
                    self.pending_tasks += 1;
                }
                Err(e) => tracing::debug!("Rating not submitted: {}", e),
            },
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        self.pending_tasks = self.pending_tasks.saturating_sub(1);
        tracing::debug!(task = result.task_type(), "Task finished");

        match result {
            TaskResult::StagesLoaded(result) => {
                self.message_overlay.clear_message();
                match result {
                    Ok(stages) => {
                        let still_valid = self
                            .controller
                            .stage()
                            .map_or(true, |id| stages.iter().any(|s| s.stage_id == id));
                        if !still_valid {
                            self.controller.select_stage(None);
                        }
                        self.stages = stages;
                    }
                    Err(message) => {
                        self.modals.error.show_error(
                            "Could not load stages",
                            message,
                            Some(format!("Backend: {}", self.settings.api_url)),
                        );
                    }
                }
            }

            TaskResult::PageLoaded(outcome) => {
                if self.controller.apply(outcome) {
                    if let ListStatus::Failed(message) = self.controller.status() {
                        tracing::warn!("Resource list failed: {}", message);
                    }
                }
            }

            TaskResult::RatingSubmitted(result) => match self.rating.finish(result) {
                SubmitOutcome::Reload => {
                    self.notice = self.rating.take_notice();
                    self.reload_current_page();
                }
                SubmitOutcome::Retry | SubmitOutcome::Rejected => {}
            },

            TaskResult::ReviewsLoaded { organism_name, result } => {
                self.modals.reviews.set_result(&organism_name, result);
            }

            TaskResult::StructureLoaded { file_name, result } => {
                self.modals.structure.set_result(&file_name, result);
            }

            TaskResult::CacheSwept(removed) => {
                tracing::debug!(removed, "Cache sweep finished");
            }
        }
    }

    fn sweep_if_due(&mut self) {
        if self.last_sweep.elapsed() >= CACHE_SWEEP_INTERVAL {
            self.last_sweep = Instant::now();
            self.task_manager.sweep_cache();
            self.pending_tasks += 1;
        }
    }

    fn track_theme(&mut self, ctx: &egui::Context) {
        let dark_mode = ctx.style().visuals.dark_mode;
        if dark_mode != self.settings.dark_mode {
            self.settings.dark_mode = dark_mode;
            self.settings.save();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };

        egui::TopBottomPanel::bottom("notice_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(self.theme.accent(ui.ctx()), format!("✔ {notice}"));
                if ui.small_button("Dismiss").clicked() {
                    self.notice = None;
                }
            });
        });
    }
}

impl eframe::App for FloraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let task_results = self.task_manager.poll_results();

        for result in task_results {
            self.handle_task_result(result);
        }

        self.sweep_if_due();
        self.track_theme(ctx);

        let busy = self.controller.is_loading();
        if let Some(action) = TopBar::show(ctx, &self.stages, self.controller.stage(), &self.map, busy) {
            self.handle_top_bar(action);
        }

        self.show_notice(ctx);

        if let Some(code) = WorldMap::show(ctx, &mut self.map, &self.theme) {
            self.select_country(Some(code));
        }

        if let Some(action) = resources_panel(ctx, self.controller.view(), &self.theme) {
            self.handle_resource_action(action);
        }

        if self.rating.is_open() {
            if let Some(action) = self.modals.rating.show(ctx, &mut self.rating, &self.theme) {
                self.handle_rating_action(action);
            }
        }

        self.modals.reviews.show(ctx, &self.theme);
        self.modals.structure.show(ctx, &self.theme);
        self.modals.about.show(ctx, &self.theme);
        self.message_overlay.show(ctx, &self.theme);
        self.modals.error.show(ctx, &self.theme);

        let waiting = self.pending_tasks > 0 || self.rating.phase() == RatingPhase::Submitting;
        ctx.request_repaint_after(if waiting { BUSY_REPAINT_INTERVAL } else { CACHE_SWEEP_INTERVAL });
    }
}
