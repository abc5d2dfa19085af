mod actions;
pub mod bridge;
mod display;
mod events;
mod state;
pub mod status;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use snip_core::capture::ScreenCapturer;
use snip_core::overlay::PointerEvent;
use snip_core::session::{Pipeline, Settings};
use snip_core::sink::{ClipboardSink, ResultSink};
use snip_core::types::AppEvent;

use crate::bridge::UiBridge;
use crate::display::WindowDisplay;
use crate::state::UiState;

slint::include_modules!();

/// Startup values for the control window and the overlay
pub struct UiOptions {
    pub settings: Settings,
    /// Language picker choices
    pub languages: Vec<String>,
    pub overlay_dim: f32,
    pub hide_delay: Duration,
}

/// Build both windows and run the slint event loop on the calling thread until the control window closes
pub fn run_ui(
    options: UiOptions,
    capturer: Box<dyn ScreenCapturer>,
    clipboard: Box<dyn ClipboardSink>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let control = ControlWindow::new()?;
    let overlay = SelectionOverlay::new()?;

    let sink = ResultSink::new(clipboard, Box::new(WindowDisplay::new(control.as_weak())));
    init_control(&control, &options);

    let state = Rc::new(UiState {
        pipeline: RefCell::new(Pipeline::new(options.settings, sink)),
        control: control.as_weak(),
        overlay: overlay.as_weak(),
        capturer,
        bridge: UiBridge::new(ui_to_app_tx),
        overlay_dim: options.overlay_dim,
        hide_delay: options.hide_delay,
    });

    wire_control(&control, &state);
    wire_overlay(&overlay, &state);

    let listener = state.clone();
    UiBridge::listen(app_to_ui_rx, move |event| events::handle_event(&listener, event))?;

    control.window().on_close_requested(|| {
        slint::quit_event_loop().ok();
        slint::CloseRequestResponse::HideWindow
    });

    control.show()?;
    slint::run_event_loop_until_quit()?;

    overlay.hide().ok();
    tracing::info!("UI closed");
    Ok(())
}

fn init_control(control: &ControlWindow, options: &UiOptions) {
    let current = options.settings.languages.to_string();
    let mut choices = options.languages.clone();
    if !choices.contains(&current) {
        choices.push(current.clone());
    }
    let choices: Vec<SharedString> = choices.into_iter().map(SharedString::from).collect();

    control.set_languages(ModelRc::new(VecModel::from(choices)));
    control.set_language(current.into());
    control.set_mode_index(actions::mode_index(options.settings.mode));
    control.set_debug_mode(options.settings.debug);
    control.set_plain_text(options.settings.plain_text);
    control.set_status(status::LOADING.into());
    control.set_status_ok(false);
}

fn wire_control(control: &ControlWindow, state: &Rc<UiState>) {
    let s = state.clone();
    control.on_start_snip(move || actions::start_capture(&s));

    let s = state.clone();
    control.on_copy_result(move || actions::copy_result(&s));

    let s = state.clone();
    control.on_mode_changed(move |index| {
        s.pipeline
            .borrow_mut()
            .set_mode(actions::mode_from_index(index));
    });

    let s = state.clone();
    control.on_language_changed(move |value| actions::set_languages(&s, &value));

    let s = state.clone();
    control.on_debug_toggled(move |enabled| s.pipeline.borrow_mut().set_debug(enabled));

    let s = state.clone();
    control.on_plain_text_toggled(move |enabled| s.pipeline.borrow_mut().set_plain_text(enabled));
}

fn wire_overlay(overlay: &SelectionOverlay, state: &Rc<UiState>) {
    let s = state.clone();
    overlay.on_pointer_down(move |x, y| actions::pointer(&s, PointerEvent::Down, x, y));

    let s = state.clone();
    overlay.on_pointer_move(move |x, y| actions::pointer(&s, PointerEvent::Move, x, y));

    let s = state.clone();
    overlay.on_pointer_up(move |x, y| actions::pointer(&s, PointerEvent::Up, x, y));

    let s = state.clone();
    overlay.on_cancel(move || actions::cancel_selection(&s));
}
