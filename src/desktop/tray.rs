//! Tray indicator backed by `tray-icon` and a `tao` event loop.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy},
    platform::run_return::EventLoopExtRunReturn,
};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem},
    TrayIcon, TrayIconBuilder,
};

use crate::{
    desktop::icon,
    indicator::{trigger, Indicator, Trigger, TriggerHandle},
};

/// Requests applied to the tray on the event loop thread.
#[derive(Debug)]
pub enum TrayCommand {
    SetIcon(Vec<u8>),
    SetTitle(String),
    SetTooltip(String),
    AddMenuItem {
        id: MenuId,
        label: String,
        enabled: bool,
    },
    Quit,
}

type Routes = Arc<Mutex<HashMap<MenuId, TriggerHandle>>>;

/// [`Indicator`] handle usable from any thread.
pub struct TrayIndicator {
    proxy: Mutex<EventLoopProxy<TrayCommand>>,
    routes: Routes,
    next_id: AtomicUsize,
}

impl TrayIndicator {
    /// Creates the handle and routes menu clicks to the matching triggers.
    pub fn new(proxy: EventLoopProxy<TrayCommand>) -> Self {
        let routes: Routes = Arc::default();

        let clicks = Arc::clone(&routes);
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            let Ok(routes) = clicks.lock() else {
                return;
            };
            if let Some(handle) = routes.get(&event.id) {
                if !handle.fire() {
                    tracing::debug!(id = ?event.id, "click ignored, nobody is listening");
                }
            }
        }));

        Self {
            proxy: Mutex::new(proxy),
            routes,
            next_id: AtomicUsize::new(0),
        }
    }

    fn send(&self, command: TrayCommand) {
        let Ok(proxy) = self.proxy.lock() else {
            return;
        };
        if proxy.send_event(command).is_err() {
            tracing::debug!("tray event loop already closed");
        }
    }

    fn menu_id(&self) -> MenuId {
        MenuId::new(format!(
            "trayotp-{}",
            self.next_id.fetch_add(1, Ordering::Relaxed)
        ))
    }
}

impl Indicator for TrayIndicator {
    fn set_icon(&self, icon: &[u8]) {
        self.send(TrayCommand::SetIcon(icon.to_vec()));
    }

    fn set_title(&self, title: &str) {
        self.send(TrayCommand::SetTitle(title.into()));
    }

    fn set_tooltip(&self, tooltip: &str) {
        self.send(TrayCommand::SetTooltip(tooltip.into()));
    }

    fn add_menu_item(&self, label: &str, description: &str) -> Trigger {
        let id = self.menu_id();
        let (handle, trigger) = trigger();

        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(id.clone(), handle);
        }
        tracing::debug!(label = %label, description = %description, "adding menu item");

        self.send(TrayCommand::AddMenuItem {
            id,
            label: label.into(),
            enabled: true,
        });
        trigger
    }

    fn add_notice(&self, label: &str) {
        self.send(TrayCommand::AddMenuItem {
            id: self.menu_id(),
            label: label.into(),
            enabled: false,
        });
    }

    fn quit(&self) {
        self.send(TrayCommand::Quit);
    }
}

pub fn event_loop() -> EventLoop<TrayCommand> {
    EventLoopBuilder::<TrayCommand>::with_user_event().build()
}

/// Tray contents, kept so they survive until the icon exists.
#[derive(Default)]
struct TrayState {
    menu: Option<Menu>,
    items: Vec<MenuItem>,
    tray: Option<TrayIcon>,
    icon: Vec<u8>,
    title: String,
    tooltip: String,
}

impl TrayState {
    fn build(&mut self) {
        let menu = Menu::new();
        for item in &self.items {
            if let Err(e) = menu.append(item) {
                tracing::warn!(error = %e, "menu item not added");
            }
        }

        let mut builder = TrayIconBuilder::new()
            .with_menu(Box::new(menu.clone()))
            .with_title(&self.title)
            .with_tooltip(&self.tooltip);
        if let Some(icon) = icon::tray_icon(&self.icon) {
            builder = builder.with_icon(icon);
        }

        match builder.build() {
            Ok(tray) => self.tray = Some(tray),
            Err(e) => tracing::error!(error = %e, "tray icon could not be created"),
        }
        self.menu = Some(menu);
    }

    fn apply(&mut self, command: TrayCommand) -> bool {
        match command {
            TrayCommand::SetIcon(bytes) => {
                if let Some(tray) = &self.tray {
                    if let Err(e) = tray.set_icon(icon::tray_icon(&bytes)) {
                        tracing::warn!(error = %e, "tray icon not updated");
                    }
                }
                self.icon = bytes;
            }
            TrayCommand::SetTitle(title) => {
                if let Some(tray) = &self.tray {
                    tray.set_title(Some(&title));
                }
                self.title = title;
            }
            TrayCommand::SetTooltip(tooltip) => {
                if let Some(tray) = &self.tray {
                    if let Err(e) = tray.set_tooltip(Some(&tooltip)) {
                        tracing::warn!(error = %e, "tray tooltip not updated");
                    }
                }
                self.tooltip = tooltip;
            }
            TrayCommand::AddMenuItem { id, label, enabled } => {
                let item = MenuItem::with_id(id, &label, enabled, None);
                if let Some(menu) = &self.menu {
                    if let Err(e) = menu.append(&item) {
                        tracing::warn!(error = %e, label = %label, "menu item not added");
                    }
                }
                self.items.push(item);
            }
            TrayCommand::Quit => {
                self.tray = None;
                return false;
            }
        }

        true
    }
}

/// Pumps the event loop on the calling thread until [`TrayCommand::Quit`].
pub fn run(mut event_loop: EventLoop<TrayCommand>) {
    let mut state = TrayState::default();

    event_loop.run_return(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => state.build(),
            Event::UserEvent(command) => {
                if !state.apply(command) {
                    tracing::debug!("tray released");
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
