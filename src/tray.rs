use ksni::{menu::*, *};

use crate::APP_ID;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMsg {
    ToggleVisibility,
    Quit,
}

#[derive(Debug)]
pub struct VoltrayTray {
    tx: relm4::Sender<TrayMsg>,
    icon_name: String,
}

impl VoltrayTray {
    pub fn new(icon_name: String) -> (Self, relm4::Receiver<TrayMsg>) {
        let (tx, rx) = relm4::channel();
        (Self { tx, icon_name }, rx)
    }
}

impl Tray for VoltrayTray {
    fn category(&self) -> Category {
        Category::Hardware
    }
    fn icon_name(&self) -> String {
        self.icon_name.clone()
    }
    fn id(&self) -> String {
        APP_ID.to_owned()
    }
    fn title(&self) -> String {
        "System Volume".to_owned()
    }
    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: "System Volume".to_owned(),
            description: "Scroll on the panel to change the volume".to_owned(),
            ..Default::default()
        }
    }
    fn activate(&mut self, _x: i32, _y: i32) {
        let _ = self.tx.send(TrayMsg::ToggleVisibility);
    }
    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: "System Volume".to_owned(),
                activate: Box::new(|tray: &mut Self| {
                    let _ = tray.tx.send(TrayMsg::ToggleVisibility);
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".to_owned(),
                icon_name: "application-exit".to_owned(),
                activate: Box::new(|tray: &mut Self| {
                    let _ = tray.tx.send(TrayMsg::Quit);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

