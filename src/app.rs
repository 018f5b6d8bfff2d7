use std::path::{Path, PathBuf};

use egui::{Key, KeyboardShortcut, Modifiers};

use crate::{config::AppConfig, editor::Editor, loader, viewer::Viewer};

const OPEN_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
const START_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::ALT, Key::O);
const EXIT_CROP_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::NONE, Key::Escape);

/// Where "Open Floorplan" gets its path from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenSource {
    Dialog,
    /// Skip the dialog and always open this file.
    Fixed(PathBuf),
}

pub struct FloorplanApp {
    editor: Editor,
    viewer: Viewer,
    open_source: OpenSource,
    /// Last failure worth showing, cleared by the next successful action.
    status_error: Option<String>,
    config: AppConfig,
}

impl FloorplanApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        open_source: OpenSource,
        preview_max: u32,
    ) -> Self {
        Self {
            editor: Editor::new(),
            viewer: Viewer::new(preview_max),
            open_source,
            status_error: None,
            config,
        }
    }

    fn pick_path(&self) -> Option<PathBuf> {
        match &self.open_source {
            OpenSource::Fixed(path) => Some(path.clone()),
            OpenSource::Dialog => {
                let mut dialog = rfd::FileDialog::new()
                    .set_title("Open Floorplan Image")
                    .add_filter("Images", loader::SUPPORTED_IMAGE_EXTS);
                if let Some(dir) = &self.config.open_dir {
                    dialog = dialog.set_directory(dir);
                }
                dialog.pick_file()
            }
        }
    }

    fn open_floorplan(&mut self) {
        // Cancelling the dialog keeps whatever was open before.
        let Some(path) = self.pick_path() else {
            return;
        };
        self.open_path(&path);
    }

    fn open_path(&mut self, path: &Path) {
        match self.editor.open(path) {
            Ok(()) => {
                self.status_error = None;
                self.config.open_dir = path.parent().map(Path::to_path_buf);
            }
            Err(err) => {
                tracing::warn!("{err}");
                self.status_error = Some(err.to_string());
            }
        }
    }

    fn toggle_crop_mode(&mut self) {
        if self.editor.overlay().is_active() {
            self.editor.exit_crop_mode();
        } else {
            self.editor.enter_crop_mode();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.iter().find(|p| loader::is_supported_image(p)) {
            self.open_path(path);
        } else if let Some(path) = dropped.first() {
            tracing::debug!(
                path = %path.display(),
                "ignoring dropped file with unsupported extension"
            );
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_shortcut(&OPEN_SHORTCUT)) {
            self.open_floorplan();
        }
        if !self.editor.store().has_image()
            && ctx.input_mut(|i| i.consume_shortcut(&START_SHORTCUT))
        {
            self.open_floorplan();
        }
        if self.editor.overlay().is_active()
            && ctx.input_mut(|i| i.consume_shortcut(&EXIT_CROP_SHORTCUT))
        {
            self.editor.exit_crop_mode();
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("main_menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let open = egui::Button::new("Open Floorplan")
                        .shortcut_text(ctx.format_shortcut(&OPEN_SHORTCUT));
                    if ui.add(open).clicked() {
                        ui.close_menu();
                        self.open_floorplan();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                if self.editor.store().has_image() {
                    ui.menu_button("Edit", |ui| {
                        let cropping = self.editor.overlay().is_active();
                        if ui.selectable_label(cropping, "Crop Floorplan").clicked() {
                            ui.close_menu();
                            self.toggle_crop_mode();
                        }
                        let reset = ui.add_enabled(
                            self.editor.store().is_cropped(),
                            egui::Button::new("Reset Floorplan"),
                        );
                        if reset.clicked() {
                            ui.close_menu();
                            self.editor.reset();
                        }
                    });
                }
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let store = self.editor.store();
                if let Some(name) = store.source_path().and_then(Path::file_name) {
                    ui.label(egui::RichText::new(name.to_string_lossy()).strong());
                }
                if let Ok(current) = store.current() {
                    ui.label(format!("{} × {} px", current.width(), current.height()));
                }
                if let (true, Some(original)) = (store.is_cropped(), store.original()) {
                    let (x, y) = store.current_origin();
                    ui.weak(format!(
                        "cropped at ({x}, {y}) from {} × {}",
                        original.width(),
                        original.height()
                    ));
                }
                if self.editor.overlay().is_active() {
                    ui.separator();
                    ui.label("Drag over the floorplan to crop. Esc to finish.");
                }
                if let Some(err) = &self.status_error {
                    ui.separator();
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
            });
        });
    }

    fn show_empty_canvas(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(((ui.available_height() - 50.0) / 2.0).max(0.0));
            let button = egui::Button::new("Click here to open a floorplan and get started!");
            if ui.add_sized([300.0, 50.0], button).clicked() {
                self.open_floorplan();
            }
        });
    }
}

impl eframe::App for FloorplanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window size for saving on exit
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.window_width = Some(rect.width());
            self.config.window_height = Some(rect.height());
        }

        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);
        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.editor.store().has_image() {
                self.show_empty_canvas(ui);
                return;
            }
            match self.viewer.show(ui, &mut self.editor) {
                Some(Ok(region)) => {
                    tracing::debug!(?region, "crop applied");
                    self.status_error = None;
                }
                Some(Err(err)) => tracing::debug!("crop ignored: {err}"),
                None => {}
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(err) = self.config.save() {
            tracing::warn!("could not save config: {err:#}");
        }
    }
}
