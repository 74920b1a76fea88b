//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> eframe::Result<()> {
    env_logger::init();

    if std::env::args().skip(1).any(|arg| arg == "--shortcuts") {
        sketchpad_app::ShortcutRegistry::print_all();
        return Ok(());
    }

    log::info!("Starting SketchPad");
    let config = sketchpad_core::AppConfig::load();
    sketchpad_app::SketchpadApp::run(config)
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
