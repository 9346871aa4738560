use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::sync::Arc;
use std::time::Duration;

mod controller;
mod models;
mod projector;
mod search_client;
mod session;

use crate::controller::QueryController;
use crate::models::SortKey;
use crate::search_client::SearchClient;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Hacker News Search"),
        ..Default::default()
    };

    eframe::run_native(
        "Hacker News Search",
        options,
        Box::new(|_cc| Ok(Box::new(SearchApp::new()))),
    )
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    error: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            error: Color32::from_rgb(229, 85, 85),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            error: Color32::from_rgb(180, 40, 40),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);

        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }
}

/// What the "More" button should look like right now. Resolved by the
/// caller from the loading flag, matched on where it's drawn.
enum MoreButton {
    Plain,
    Loading,
}

struct SearchApp {
    controller: QueryController,
    theme: AppTheme,
    is_dark_mode: bool,
    // First frame kicks off the fetch for the default term.
    initialized: bool,
}

impl SearchApp {
    fn new() -> Self {
        Self {
            controller: QueryController::new(Arc::new(SearchClient::new())),
            theme: AppTheme::dark(),
            is_dark_mode: true,
            initialized: false,
        }
    }

    fn render_search_row(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Search")
                    .color(self.theme.secondary_text)
                    .size(15.0),
            );

            let mut draft = self.controller.draft_term().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .desired_width(280.0)
                    .hint_text("search stories..."),
            );
            if response.changed() {
                self.controller.set_draft_term(draft);
            }

            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let search_btn = ui.add(
                egui::Button::new(
                    RichText::new("Search")
                        .color(self.theme.button_foreground)
                        .size(14.0),
                )
                .min_size(egui::Vec2::new(80.0, 26.0))
                .corner_radius(CornerRadius::same(6))
                .fill(self.theme.button_background),
            );

            if search_btn.clicked() || submitted {
                self.controller.submit_search();
            }

            if search_btn.hovered() {
                ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
            }
        });
    }

    fn sort_button(&mut self, ui: &mut Ui, label: &str, key: SortKey) {
        let active = self.controller.sort_key() == key;
        let text = if active {
            let arrow = if self.controller.sort_reversed() {
                "▲"
            } else {
                "▼"
            };
            format!("{} {}", label, arrow)
        } else {
            label.to_string()
        };

        let btn = ui.add(
            egui::Button::new(
                RichText::new(text)
                    .color(if active {
                        self.theme.highlight
                    } else {
                        self.theme.secondary_text
                    })
                    .size(13.0),
            )
            .fill(self.theme.card_background)
            .stroke(Stroke::NONE),
        );

        if btn.clicked() {
            self.controller.on_sort(key);
        }
        if btn.hovered() {
            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }

    fn render_header_row(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.allocate_ui_with_layout(
                egui::Vec2::new(420.0, 20.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| self.sort_button(ui, "Title", SortKey::Title),
            );
            ui.allocate_ui_with_layout(
                egui::Vec2::new(180.0, 20.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| self.sort_button(ui, "Author", SortKey::Author),
            );
            ui.allocate_ui_with_layout(
                egui::Vec2::new(100.0, 20.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| self.sort_button(ui, "Comments", SortKey::Comments),
            );
            ui.allocate_ui_with_layout(
                egui::Vec2::new(100.0, 20.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| self.sort_button(ui, "Points", SortKey::Points),
            );
        });
        ui.separator();
    }

    fn render_story_rows(&mut self, ui: &mut Ui) {
        let stories = self.controller.visible_stories();
        let mut dismissed: Option<String> = None;

        for story in &stories {
            ui.horizontal(|ui| {
                ui.allocate_ui_with_layout(
                    egui::Vec2::new(420.0, 22.0),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        let title = ui.add(
                            egui::Label::new(
                                RichText::new(&story.title).color(self.theme.text).size(14.0),
                            )
                            .sense(egui::Sense::click())
                            .truncate(),
                        );
                        if title.hovered() && !story.url.is_empty() {
                            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                        }
                        if title.clicked() && !story.url.is_empty() {
                            if let Err(e) = open::that(&story.url) {
                                log::error!("Failed to open URL {}: {}", story.url, e);
                            }
                        }
                    },
                );

                ui.allocate_ui_with_layout(
                    egui::Vec2::new(180.0, 22.0),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.add(
                            egui::Label::new(
                                RichText::new(&story.author)
                                    .color(self.theme.secondary_text)
                                    .size(13.0),
                            )
                            .truncate(),
                        );
                    },
                );

                ui.allocate_ui_with_layout(
                    egui::Vec2::new(100.0, 22.0),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.label(
                            RichText::new(story.num_comments.to_string())
                                .color(self.theme.secondary_text)
                                .size(13.0),
                        );
                    },
                );

                ui.allocate_ui_with_layout(
                    egui::Vec2::new(100.0, 22.0),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.label(
                            RichText::new(story.points.to_string())
                                .color(self.theme.highlight)
                                .size(13.0),
                        );
                    },
                );

                let dismiss_btn = ui.add(
                    egui::Button::new(
                        RichText::new("Dismiss")
                            .color(self.theme.button_foreground)
                            .size(12.0),
                    )
                    .corner_radius(CornerRadius::same(4))
                    .fill(self.theme.button_background),
                );
                if dismiss_btn.clicked() {
                    dismissed = Some(story.id.clone());
                }
                if dismiss_btn.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }
            });
            ui.add_space(2.0);
        }

        if let Some(id) = dismissed {
            self.controller.on_dismiss(&id);
        }

        if stories.is_empty() && !self.controller.is_loading() {
            ui.add_space(12.0);
            ui.label(
                RichText::new(format!(
                    "No results for '{}'",
                    self.controller.active_term()
                ))
                .color(self.theme.secondary_text)
                .size(14.0),
            );
        }
    }

    fn render_more_button(&mut self, ui: &mut Ui) {
        let face = if self.controller.is_loading() {
            MoreButton::Loading
        } else {
            MoreButton::Plain
        };

        match face {
            MoreButton::Loading => {
                let _ = ui.add_enabled(
                    false,
                    egui::Button::new(
                        RichText::new("Loading ...")
                            .color(self.theme.secondary_text)
                            .size(14.0),
                    )
                    .min_size(egui::Vec2::new(100.0, 28.0))
                    .corner_radius(CornerRadius::same(6)),
                );
            }
            MoreButton::Plain => {
                let more_btn = ui.add(
                    egui::Button::new(
                        RichText::new("More")
                            .color(self.theme.button_foreground)
                            .size(14.0),
                    )
                    .min_size(egui::Vec2::new(100.0, 28.0))
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
                );
                if more_btn.clicked() {
                    self.controller.load_next_page();
                }
                if more_btn.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }
            }
        }
    }
}

impl eframe::App for SearchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        if !self.initialized {
            self.initialized = true;
            self.controller.load_next_page();
        }

        if self.controller.poll_fetch() {
            ctx.request_repaint();
        }
        if self.controller.is_loading() {
            // Keep polling while a fetch is out.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new("Hacker News Search")
                        .color(self.theme.highlight)
                        .size(24.0),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_icon = if self.is_dark_mode { "☀" } else { "☾" };
                    let theme_btn = ui.add(
                        egui::Button::new(
                            RichText::new(theme_icon)
                                .color(self.theme.button_foreground)
                                .size(20.0),
                        )
                        .min_size(egui::Vec2::new(32.0, 32.0))
                        .corner_radius(CornerRadius::same(16))
                        .fill(self.theme.button_background),
                    );
                    if theme_btn.clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        self.theme = if self.is_dark_mode {
                            AppTheme::dark()
                        } else {
                            AppTheme::light()
                        };
                    }
                });
            });

            ui.add_space(8.0);
            self.render_search_row(ui);
            ui.add_space(6.0);

            if self.controller.has_error() {
                ui.label(
                    RichText::new("Something went wrong ...")
                        .color(self.theme.error)
                        .size(14.0),
                );
                ui.add_space(4.0);
            }

            self.render_header_row(ui);

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_story_rows(ui);

                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        self.render_more_button(ui);
                    });
                    ui.add_space(10.0);
                });
        });
    }
}
