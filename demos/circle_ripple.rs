//! Two ripple buttons on a calloop event loop.
//!
//! The first button expands into the screen two seconds after being pressed.
//! The second one stands in for a login form: it ripples while a fake
//! request runs on a worker thread, then animates back when the result
//! arrives. Run with `RUST_LOG=debug` to follow the state transitions.

use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use circle_ripple::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

struct Screen {
    view: HostView,
    dismiss: RippleButton,
    login: RippleButton,
    login_done: bool,
    frames: u64,
}

impl Screen {
    fn new() -> circle_ripple::Result<Self> {
        let view = HostView::new(Rect::new(0.0, 0.0, 360.0, 640.0));

        let dismiss = RippleButton::new(
            Rect::new(130.0, 200.0, 100.0, 100.0),
            ButtonVisualState::new(Color::from_hex(0xE91E63), Color::TRANSPARENT, Color::WHITE),
        );

        let login = RippleButton::with_config(
            Rect::new(40.0, 480.0, 280.0, 48.0),
            ButtonVisualState::new(Color::from_hex(0x2196F3), Color::WHITE, Color::WHITE),
            ButtonConfig::new().corner_radius(24.0).border_width(1.0),
        )?;

        Ok(Self {
            view,
            dismiss,
            login,
            login_done: false,
            frames: 0,
        })
    }

    fn frame(&mut self, now: Instant) {
        self.dismiss.advance(now);
        self.login.advance(now);
        self.frames += 1;

        if self.frames % 30 == 0 {
            let commands = self.dismiss.display_list().len() + self.login.display_list().len();
            log::info!(
                "frame {}: dismiss {:?}, login {:?}, {} draw commands",
                self.frames,
                self.dismiss.state(),
                self.login.state(),
                commands
            );
        }
    }

    fn finished(&self) -> bool {
        self.login_done
            && self.dismiss.state() == ButtonState::Idle
            && self.login.state() == ButtonState::Idle
    }
}

fn main() -> circle_ripple::Result<()> {
    circle_ripple::init_logging();

    let mut event_loop: EventLoop<'static, Screen> = EventLoop::try_new()?;
    let dispatcher = Dispatcher::new(event_loop.handle())?;
    let mut screen = Screen::new()?;

    event_loop
        .handle()
        .insert_source(Timer::from_duration(FRAME), |_, _, screen: &mut Screen| {
            screen.frame(Instant::now());
            TimeoutAction::ToDuration(FRAME)
        })
        .map_err(|e| e.error)?;

    // Press both buttons on the first loop iteration
    dispatcher.main(|screen: &mut Screen| {
        let now = Instant::now();
        if let Err(e) = screen.dismiss.start(now) {
            log::error!("dismiss button: {}", e);
        }
        if let Err(e) = screen.login.start(now) {
            log::error!("login button: {}", e);
        }
    })?;

    dispatcher.after(Duration::from_secs(2), |screen: &mut Screen| {
        let Screen { view, dismiss, .. } = screen;
        if let Err(e) = dismiss.stop_into(view, true, Instant::now()) {
            log::error!("dismiss button: {}", e);
        }
    })?;

    dispatcher.run_in_background(
        || {
            std::thread::sleep(Duration::from_secs(3));
            "signed in"
        },
        |status, screen: &mut Screen| {
            log::info!("login request: {}", status);
            screen.login_done = true;
            if let Err(e) = screen.login.stop(true, Instant::now()) {
                log::error!("login button: {}", e);
            }
        },
    );

    while !screen.finished() {
        event_loop.dispatch(Some(FRAME), &mut screen)?;
    }

    log::info!(
        "done after {} frames; destination clips: {}",
        screen.frames,
        screen.view.clips_to_bounds
    );
    Ok(())
}
