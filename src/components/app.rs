use gtk::glib::Propagation;
use log::{debug, error, info, warn};
use relm4::gtk::gdk::Key;
use relm4::gtk::prelude::*;
use relm4::{prelude::*, Sender};

use crate::pactl::{Pactl, SinkRecord};
use crate::poller::{PollerHandle, RecordReceiver};
use crate::settings::VoltraySettings;
use crate::surface::{Direction, Surface};
use crate::tray::TrayMsg;

const WINDOW_TITLE: &str = "System Volume";

pub struct AppInit {
    pub settings: VoltraySettings,
    pub tray: relm4::Receiver<TrayMsg>,
}

pub struct App {
    surface: Surface<Pactl>,
    poller: Option<PollerHandle>,
}

#[derive(Debug)]
pub enum Msg {
    Scroll(Direction),
    VolumeStep(Direction),
    ToggleMute,
    Hide,
    CloseRequested,
    Quit,
}

#[derive(Debug)]
pub enum CommandMsg {
    Record(Option<SinkRecord>),
    Tray(TrayMsg),
}

/// M, H and Q work with or without shift.
fn shortcut(key: Key) -> Option<Msg> {
    let key = key.to_lower();
    if key == Key::m {
        Some(Msg::ToggleMute)
    } else if key == Key::Left {
        Some(Msg::VolumeStep(Direction::Down))
    } else if key == Key::Right {
        Some(Msg::VolumeStep(Direction::Up))
    } else if key == Key::h {
        Some(Msg::Hide)
    } else if key == Key::q {
        Some(Msg::Quit)
    } else {
        None
    }
}

/// Positive deltas scroll down.
fn scroll_direction(dy: f64) -> Option<Direction> {
    if dy < 0.0 {
        Some(Direction::Up)
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else {
        None
    }
}

#[relm4::component(pub)]
impl Component for App {
    type CommandOutput = CommandMsg;
    type Init = AppInit;
    type Input = Msg;
    type Output = ();

    view! {
        main_window = gtk::ApplicationWindow {
            set_title: Some(WINDOW_TITLE),
            set_default_size: (360, 48),
            set_resizable: false,
            add_css_class: "volume-panel",

            #[watch]
            set_visible: model.surface.is_visible(),

            connect_close_request[sender] => move |_| {
                sender.input(Msg::CloseRequested);
                Propagation::Stop
            },

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match shortcut(key) {
                        Some(msg) => {
                            sender.input(msg);
                            Propagation::Stop
                        }
                        None => Propagation::Proceed,
                    }
                }
            },
            // One step per wheel notch, even with smooth scrolling
            add_controller = gtk::EventControllerScroll::new(
                gtk::EventControllerScrollFlags::VERTICAL
                    | gtk::EventControllerScrollFlags::DISCRETE
            ) {
                connect_scroll[sender] => move |_, _, dy| {
                    if let Some(direction) = scroll_direction(dy) {
                        sender.input(Msg::Scroll(direction));
                    }
                    Propagation::Stop
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 4,
                set_margin_all: 2,

                gtk::Label {
                    add_css_class: "sink-state",
                    set_width_chars: 10,

                    #[watch]
                    set_label: &model.surface.view().state_text,
                    #[watch]
                    set_tooltip: &model.surface.view().state_tooltip,
                },
                gtk::ProgressBar {
                    add_css_class: "volume",
                    set_hexpand: true,
                    set_valign: gtk::Align::Center,
                    set_show_text: false,

                    #[watch]
                    set_fraction: model.surface.view().fraction(),
                    #[watch]
                    set_tooltip: &model.surface.view().volume_tooltip,
                },
                gtk::Button {
                    set_width_request: 44,

                    #[watch]
                    set_label: &model.surface.view().button_text,
                    #[watch]
                    set_tooltip: &model.surface.view().button_tooltip,
                    #[watch]
                    set_css_classes: if model.surface.view().muted
                        { &["mute", "muted"] } else { &["mute"] },

                    connect_clicked => Msg::ToggleMute,
                },
            }
        }
    }

    fn init(init: AppInit, root: Self::Root, sender: ComponentSender<Self>) -> ComponentParts<Self> {
        let AppInit { settings, tray } = init;
        let pactl = Pactl::new(&settings.pactl_program);

        let poller = match PollerHandle::spawn(pactl.clone(), settings.poll_interval()) {
            Ok((poller, records)) => {
                forward_records(&sender, records);
                Some(poller)
            }
            Err(err) => {
                error!("Sink state will not be updated: {err:#}");
                None
            }
        };

        sender.command(move |out, shutdown| {
            shutdown
                .register(async move {
                    while let Some(msg) = tray.recv().await {
                        if out.send(CommandMsg::Tray(msg)).is_err() {
                            break;
                        }
                    }
                })
                .drop_on_shutdown()
        });

        let model = App {
            surface: Surface::new(pactl, settings.volume_steps()),
            poller,
        };

        let widgets = view_output!();

        if settings.start_hidden {
            sender.input(Msg::Hide);
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            Msg::Scroll(direction) => {
                if let Err(err) = self.surface.on_scroll(direction) {
                    warn!("Failed to change volume: {err}");
                }
            }
            Msg::VolumeStep(direction) => {
                if let Err(err) = self.surface.on_volume_step(direction) {
                    warn!("Failed to change volume: {err}");
                }
            }
            Msg::ToggleMute => {
                if let Err(err) = self.surface.on_mute_toggle() {
                    warn!("Failed to toggle mute: {err}");
                }
            }
            Msg::Hide => self.surface.hide(),
            Msg::CloseRequested => self.surface.on_close_requested(),
            Msg::Quit => {
                debug!("Quit requested");
                if let Some(poller) = &self.poller {
                    poller.stop();
                }
                relm4::main_application().quit();
            }
        }
    }

    fn update_cmd(
        &mut self,
        message: CommandMsg,
        sender: ComponentSender<Self>,
        _root: &Self::Root,
    ) {
        match message {
            CommandMsg::Record(record) => {
                let previous = self.surface.record().map(|record| record.name.clone());
                self.surface.on_record(record);
                if let Some(current) = self.surface.record() {
                    if previous.as_deref() != Some(current.name.as_str()) {
                        info!("Default sink is {}", current.name);
                    }
                }
            }
            CommandMsg::Tray(TrayMsg::ToggleVisibility) => self.surface.toggle_visibility(),
            CommandMsg::Tray(TrayMsg::Quit) => sender.input(Msg::Quit),
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: Sender<Self::Output>) {
        // Joins the poller thread
        drop(self.poller.take());
    }
}

/// Hands each published record to the component on the GTK main loop.
fn forward_records(sender: &ComponentSender<App>, mut records: RecordReceiver) {
    sender.command(move |out, shutdown| {
        shutdown
            .register(async move {
                while records.changed().await.is_ok() {
                    let record = records.borrow_and_update().clone();
                    if out.send(CommandMsg::Record(record)).is_err() {
                        break;
                    }
                }
            })
            .drop_on_shutdown()
    });
}
