use eframe::egui;

/// A centred window holding some view state `T`, closed by a button, the
/// title-bar cross or a click on the dimmed backdrop.
pub struct Modal<T> {
    pub open: bool,
    pub title: String,
    pub data: T,
    pub config: ModalConfig,
}

#[derive(Clone)]
pub struct ModalConfig {
    pub resizable: bool,
    pub min_size: Option<egui::Vec2>,
    pub max_height: Option<f32>,
    pub show_overlay: bool,
    pub close_on_outside_click: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            resizable: false,
            min_size: Some(egui::Vec2::new(320.0, 160.0)),
            max_height: None,
            show_overlay: true,
            close_on_outside_click: true,
        }
    }
}

impl<T: Default> Modal<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self { open: false, title: title.into(), data: T::default(), config: ModalConfig::default() }
    }
}

impl<T> Modal<T> {
    pub fn with_config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn open_with(&mut self, title: impl Into<String>, data: T) {
        self.title = title.into();
        self.data = data;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// `content` returns true to close the modal.
    pub fn show<F>(&mut self, ctx: &egui::Context, content: F)
    where
        F: FnOnce(&mut egui::Ui, &mut T) -> bool,
    {
        if !self.open {
            return;
        }

        let clicked_outside = self.config.show_overlay && Self::show_overlay(ctx);

        let mut window_open = true;
        let mut window = egui::Window::new(self.title.as_str())
            .id(egui::Id::new(("modal", self.title.as_str())))
            .open(&mut window_open)
            .collapsible(false)
            .resizable(self.config.resizable)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO);

        if let Some(min_size) = self.config.min_size {
            window = window.min_size(min_size);
        }
        if let Some(max_height) = self.config.max_height {
            window = window.max_height(max_height);
        }

        let data = &mut self.data;
        let close_requested = window.show(ctx, |ui| content(ui, data)).and_then(|r| r.inner).unwrap_or(false);

        if close_requested || !window_open || (clicked_outside && self.config.close_on_outside_click) {
            self.open = false;
        }
    }

    fn show_overlay(ctx: &egui::Context) -> bool {
        egui::Area::new(egui::Id::new("modal_overlay"))
            .order(egui::Order::Background)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                let (_rect, response) = ui.allocate_exact_size(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));
                response.clicked()
            })
            .inner
    }
}
