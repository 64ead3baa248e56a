//! Desktop practice UI.
//! Dashboard with mastery counts and verse management, plus the practice screen.

use eframe::egui;
use tracing::warn;
use verse_memory::database::db::SqliteStore;
use verse_memory::export::json::{
    collection_from_items, export_json_to_path, import_into_store, import_json,
};
use verse_memory::models::sm2::{self, ReviewPreview};
use verse_memory::models::{
    Clock, DashboardCounts, MemoryItem, NewMemoryItem, OffsetClock, Session, classify,
};
use verse_memory::{ItemStore, VerseError, practice};

const QUALITY_LABELS: [&str; 6] = [
    "Blackout",
    "Wrong",
    "Wrong (familiar)",
    "Difficult",
    "Correct",
    "Perfect",
];

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Dashboard,
    Practice,
}

pub struct MyApp {
    store: SqliteStore,
    user_id: String,
    session_limit: Option<usize>,
    clock: OffsetClock,
    items: Vec<MemoryItem>,

    current_screen: AppScreen,
    session: Option<Session>,
    show_content: bool,

    new_reference: String,
    new_content: String,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_message_dialog: bool,
    message: String,
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Dashboard => self.render_dashboard(ctx),
            AppScreen::Practice => self.render_practice_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_message_dialog {
            egui::Window::new("Verse Memory")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_message_dialog = false;
                    }
                });
        }
    }
}

impl MyApp {
    pub fn new(store: SqliteStore, user_id: String, session_limit: Option<usize>) -> Self {
        let offset = store.day_offset().unwrap_or_else(|e| {
            warn!("Could not read simulated day offset: {}", e);
            0
        });
        let mut app = Self {
            store,
            user_id,
            session_limit,
            clock: OffsetClock::new(offset),
            items: Vec::new(),
            current_screen: AppScreen::Dashboard,
            session: None,
            show_content: false,
            new_reference: String::new(),
            new_content: String::new(),
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_message_dialog: false,
            message: String::new(),
        };
        app.refresh_items();
        app
    }

    fn refresh_items(&mut self) {
        match self.store.items_for_user(&self.user_id) {
            Ok(items) => self.items = items,
            Err(e) => self.report("Loading verses failed", &e),
        }
    }

    fn report(&mut self, context: &str, error: &VerseError) {
        warn!("{}: {}", context, error);
        self.show_message(format!("{context}: {error}"));
    }

    fn show_message(&mut self, message: String) {
        self.message = message;
        self.show_message_dialog = true;
    }

    /// Renders the dashboard with counts and verse management
    fn render_dashboard(&mut self, ctx: &egui::Context) {
        let now = self.clock.now();
        let counts = DashboardCounts::from_items(&self.items, now);

        let mut action_next_day = false;
        let mut action_practice = false;
        let mut action_add = false;
        let mut action_export = false;
        let mut action_import = false;
        let mut action_delete: Option<i64> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(now.format("%Y-%m-%d").to_string());
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
            });
            ui.separator();

            ui.heading("Progress");
            egui::Grid::new("dashboard_counts").show(ui, |ui| {
                for (label, value) in counts.rows() {
                    ui.label(label);
                    ui.label(value.to_string());
                    ui.end_row();
                }
            });

            ui.add_space(10.0);
            if ui
                .add_enabled(counts.due_today > 0, egui::Button::new(format!("Practice ({} due)", counts.due_today)))
                .clicked()
            {
                action_practice = true;
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Verses").clicked() {
                    action_export = true;
                }
                if ui.button("Import Verses").clicked() {
                    action_import = true;
                }
            });

            ui.separator();

            ui.heading("Add Verse");
            ui.horizontal(|ui| {
                ui.label("Reference:");
                ui.text_edit_singleline(&mut self.new_reference);
            });
            ui.label("Text:");
            ui.text_edit_multiline(&mut self.new_content);
            if ui.button("Add Verse").clicked() {
                action_add = true;
            }

            ui.separator();

            ui.heading(format!("Verses ({})", self.items.len()));
            egui::ScrollArea::vertical()
                .id_source("verses_list")
                .max_height(250.0)
                .show(ui, |ui| {
                    for item in &self.items {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(&item.reference);
                                ui.label(format!("[{}]", classify(item)));
                                if ui.small_button("Delete").clicked() {
                                    action_delete = Some(item.id);
                                }
                            });
                            ui.label(format!(
                                "Next review: {}  ·  interval {} d  ·  ease {:.2}",
                                item.next_review_on, item.interval_days, item.ease_factor
                            ));
                        });
                    }
                });
        });

        // Execute deferred actions
        if action_next_day {
            match self.store.advance_day() {
                Ok(offset) => self.clock = OffsetClock::new(offset),
                Err(e) => self.report("Advancing the day failed", &e),
            }
        }
        if action_add {
            self.add_verse();
        }
        if let Some(id) = action_delete {
            if let Err(e) = self.store.delete_item(&self.user_id, id) {
                self.report("Deleting verse failed", &e);
            }
            self.refresh_items();
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
        if action_practice {
            self.start_practice();
        }
    }

    /// Renders the practice screen for the running session
    fn render_practice_screen(&mut self, ctx: &egui::Context) {
        let now = self.clock.now();
        let mut action_reveal = false;
        let mut action_grade: Option<u8> = None;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.session else {
                action_back = true;
                return;
            };
            let stats = session.summary();

            ui.heading("Practice");
            ui.label(session.progress_message());
            ui.label(format!(
                "Correct: {}  Incorrect: {}",
                stats.correct_count, stats.incorrect_count
            ));
            ui.add_space(20.0);

            match session.current_item() {
                None => {
                    ui.heading("Session complete");
                    ui.label(format!(
                        "{} of {} recalled ({:.0}% accuracy)",
                        stats.correct_count,
                        stats.answered(),
                        stats.accuracy()
                    ));
                }
                Some(item) => {
                    ui.group(|ui| {
                        ui.set_min_height(200.0);
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.heading(&item.reference);
                            ui.add_space(20.0);
                            if self.show_content {
                                ui.label(&item.content);
                            } else {
                                ui.label("(Recite the verse, then reveal it)");
                            }
                            ui.add_space(20.0);
                        });
                    });

                    ui.add_space(20.0);

                    if !self.show_content {
                        if ui.button("Show Verse").clicked() {
                            action_reveal = true;
                        }
                    } else {
                        ui.label("Rate your recall:");
                        let previews = sm2::preview(item, now).unwrap_or_default();
                        ui.horizontal_wrapped(|ui| {
                            for preview in &previews {
                                if ui.button(rating_label(preview)).clicked() {
                                    action_grade = Some(preview.quality);
                                }
                            }
                        });
                    }
                }
            }

            ui.add_space(20.0);
            if ui.button("Back to Dashboard").clicked() {
                action_back = true;
            }
        });

        if action_reveal {
            self.show_content = true;
        }
        if let Some(quality) = action_grade {
            self.grade(quality);
        }
        if action_back {
            self.current_screen = AppScreen::Dashboard;
            self.session = None;
            self.refresh_items();
        }
    }

    fn start_practice(&mut self) {
        match practice::begin(&self.store, &self.user_id, self.clock.now(), self.session_limit) {
            Ok(session) => {
                self.session = Some(session);
                self.show_content = false;
                self.current_screen = AppScreen::Practice;
            }
            Err(e) => self.report("Starting practice failed", &e),
        }
    }

    fn grade(&mut self, quality: u8) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match practice::submit(&self.store, &self.user_id, session, quality, now) {
            Ok(_) => self.show_content = false,
            Err(e) => self.report("Saving review failed", &e),
        }
    }

    fn add_verse(&mut self) {
        let new_item = NewMemoryItem::new(self.new_reference.clone(), self.new_content.clone());
        match self.store.add_item(&self.user_id, new_item, self.clock.now()) {
            Ok(_) => {
                self.new_reference.clear();
                self.new_content.clear();
                self.refresh_items();
            }
            Err(e) => self.report("Adding verse failed", &e),
        }
    }

    /// Handles verse export to a JSON file
    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("verses.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let collection = collection_from_items(format!("{}'s verses", self.user_id), &self.items);
        match export_json_to_path(&collection, &path) {
            Ok(()) => self.show_message(format!("Exported {} verses.", collection.verses.len())),
            Err(e) => self.report("Export failed", &e),
        }
    }

    /// Handles verse import from a JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let result = import_json(&path).and_then(|collection| {
            import_into_store(&self.store, &self.user_id, &collection, self.clock.now())
                .map(|added| (collection, added))
        });
        match result {
            Ok((collection, added)) => {
                self.refresh_items();
                self.show_message(format!(
                    "Imported {added} of {} verses from '{}'.",
                    collection.verses.len(),
                    collection.name
                ));
            }
            Err(e) => self.report(
                "Import failed (expected {\"name\": ..., \"verses\": [{\"reference\": ..., \"content\": ...}]})",
                &e,
            ),
        }
    }
}

fn rating_label(preview: &ReviewPreview) -> String {
    format!(
        "{} - {} (next {})",
        preview.quality,
        QUALITY_LABELS[preview.quality as usize],
        preview.next_review_on.format("%b %d")
    )
}
