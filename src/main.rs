mod components;
mod pactl;
mod poller;
mod settings;
mod surface;
mod tray;

use log::{debug, error};
use relm4::RelmApp;

use components::app::{App, AppInit};
use settings::VoltraySettings;
use tray::VoltrayTray;

pub const APP_ID: &str = "io.github.voltray";
/// Name of the config directory
pub const APP_NAME: &str = "voltray";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Failed to load .env file: {err}");
        }
    }
    colog::default_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = settings::load_or_create().unwrap_or_else(|err| {
        error!("Failed to load settings, using defaults: {err:#}");
        VoltraySettings::default()
    });
    debug!("Settings: {settings:?}");

    let (tray, tray_rx) = VoltrayTray::new(settings.tray_icon_name.clone());
    ksni::TrayService::new(tray).spawn();

    let app = RelmApp::new(APP_ID);
    relm4::set_global_css(&settings::stylesheet());
    app.run::<App>(AppInit {
        settings,
        tray: tray_rx,
    });
}
