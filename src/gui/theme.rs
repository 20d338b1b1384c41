use eframe::egui::{
    self,
    RichText,
};
use egui::{
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::herbarium()
    }
}

impl Theme {
    pub fn herbarium() -> Self {
        Theme { dark: ThemeDetails::forest(), light: ThemeDetails::meadow() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.details(ctx).leaf).strong()
    }

    pub fn accent(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).leaf
    }

    pub fn star(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).pollen
    }

    pub fn star_empty(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).muted
    }

    pub fn found(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).leaf
    }

    pub fn not_found(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).bark
    }

    pub fn error(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).berry
    }

    pub fn muted(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).muted
    }
}

#[derive(Clone)]
struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    muted: Color32,
    leaf: Color32,
    pollen: Color32,
    bark: Color32,
    berry: Color32,
    sky: Color32,
    panel: Color32,
    raised: Color32,
    sunken: Color32,
}

impl ThemeDetails {
    fn forest() -> Self {
        Self {
            background: Color32::from_rgb(0x1d, 0x24, 0x21),
            foreground: Color32::from_rgb(0xe8, 0xee, 0xe4),
            selection: Color32::from_rgb(0x34, 0x4a, 0x3c),
            muted: Color32::from_rgb(0x7d, 0x8c, 0x82),
            leaf: Color32::from_rgb(0x7f, 0xc8, 0x7a),
            pollen: Color32::from_rgb(0xf4, 0xc4, 0x30),
            bark: Color32::from_rgb(0xc8, 0x8a, 0x5a),
            berry: Color32::from_rgb(0xe0, 0x5d, 0x6f),
            sky: Color32::from_rgb(0x79, 0xc0, 0xe0),
            panel: Color32::from_rgb(0x18, 0x1e, 0x1b),
            raised: Color32::from_rgb(0x2a, 0x33, 0x2e),
            sunken: Color32::from_rgb(0x12, 0x17, 0x14),
        }
    }

    fn meadow() -> Self {
        Self {
            background: Color32::from_rgb(0xf7, 0xf8, 0xf2),
            foreground: Color32::from_rgb(0x23, 0x2b, 0x25),
            selection: Color32::from_rgb(0xcd, 0xe6, 0xc8),
            muted: Color32::from_rgb(0x9a, 0xa3, 0x9c),
            leaf: Color32::from_rgb(0x2e, 0x7d, 0x32),
            pollen: Color32::from_rgb(0xe0, 0xa1, 0x00),
            bark: Color32::from_rgb(0x8d, 0x5a, 0x35),
            berry: Color32::from_rgb(0xc6, 0x28, 0x28),
            sky: Color32::from_rgb(0x1e, 0x78, 0xb4),
            panel: Color32::from_rgb(0xee, 0xf1, 0xe8),
            raised: Color32::from_rgb(0xff, 0xff, 0xff),
            sunken: Color32::from_rgb(0xe3, 0xe7, 0xdc),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    let widget = |base: WidgetVisuals, bg_fill: Color32, stroke: Color32| WidgetVisuals {
        bg_fill,
        weak_bg_fill: theme.raised,
        bg_stroke: Stroke { color: stroke, ..base.bg_stroke },
        fg_stroke: Stroke { color: theme.foreground, ..base.fg_stroke },
        ..base
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: widget(default.widgets.noninteractive, theme.background, theme.sunken),
                inactive: widget(default.widgets.inactive, theme.raised, theme.sunken),
                hovered: widget(default.widgets.hovered, theme.selection, theme.leaf),
                active: widget(default.widgets.active, theme.selection, theme.leaf),
                open: widget(default.widgets.open, theme.panel, theme.leaf),
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.sky,
            faint_bg_color: theme.panel,
            extreme_bg_color: theme.sunken,
            code_bg_color: theme.panel,
            error_fg_color: theme.berry,
            warn_fg_color: theme.bark,
            window_shadow: Shadow { color: theme.sunken, ..default.window_shadow },
            window_fill: theme.background,
            window_stroke: Stroke { color: theme.raised, ..default.window_stroke },
            panel_fill: theme.panel,
            popup_shadow: Shadow { color: theme.sunken, ..default.popup_shadow },
            collapsing_header_frame: true,
            ..default
        },
    );

    ctx.all_styles_mut(|style| {
        style.interaction.tooltip_delay = 0.0;
    });
}
