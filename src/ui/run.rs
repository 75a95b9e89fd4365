use crate::error::{Result, SuggestError};
use crate::template::RetryToken;
use crate::ui::Msg as UiMsg;
use crate::ui::model::{Launch, Model, initial_model};
use bubbletea_rs::{
    Program, command::Cmd, event::KeyMsg, event::Msg, event::WindowSizeMsg, model::Model as TeaModel,
};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::OnceCell;
use std::time::Duration;

// simulated round trip of a lazy lookup
const LAZY_LATENCY: Duration = Duration::from_millis(150);

// TeaModel::init takes no arguments, so the launch parameters are parked here.
static LAUNCH: OnceCell<Launch> = OnceCell::new();

struct LazyQueryMsg(String);
struct TemplateRetryMsg(RetryToken);

/// What the session ended with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Committed(String),
    Cancelled,
}

struct TeaAdapter {
    inner: Model,
}

impl TeaAdapter {
    // timers the model asked for during the last update
    fn pending_cmds(&mut self) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = Vec::new();
        if let Some(query) = self.inner.pending_query.take() {
            cmds.push(bubbletea_rs::tick(LAZY_LATENCY, move |_| {
                Box::new(LazyQueryMsg(query.clone())) as Msg
            }));
        }
        if let Some(retry) = self.inner.pending_retry.take() {
            let token = retry.token;
            cmds.push(bubbletea_rs::tick(retry.after, move |_| {
                Box::new(TemplateRetryMsg(token)) as Msg
            }));
        }
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(bubbletea_rs::batch(cmds)),
        }
    }

    fn dispatch(&mut self, msg: UiMsg) -> Option<Cmd> {
        self.inner.update(msg);
        if self.inner.exit_value.is_some() {
            return Some(bubbletea_rs::quit());
        }
        self.pending_cmds()
    }
}

impl TeaModel for TeaAdapter {
    fn init() -> (Self, Option<Cmd>) {
        let launch = LAUNCH.get().cloned().unwrap_or_default();
        let mut adapter = TeaAdapter {
            inner: initial_model(launch),
        };
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        adapter.inner.update(UiMsg::WindowSize {
            width: width as usize,
            height: height as usize,
        });
        (adapter, Some(bubbletea_rs::window_size()))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(km) = msg.downcast_ref::<KeyMsg>() {
            // Normalize and handle global quit keys first for reliability across terminals:
            let ctrl = km.modifiers.contains(KeyModifiers::CONTROL);
            match &km.key {
                KeyCode::Char('\u{03}') => return Some(bubbletea_rs::quit()),
                KeyCode::Char('c') | KeyCode::Char('C') if ctrl => {
                    return Some(bubbletea_rs::quit());
                }
                KeyCode::Esc if !self.inner.ctl.is_opened() => {
                    return Some(bubbletea_rs::quit());
                }
                _ => {}
            }

            let ui = match &km.key {
                KeyCode::Enter => UiMsg::KeyEnter,
                KeyCode::Backspace => UiMsg::KeyBackspace,
                KeyCode::Esc => UiMsg::KeyEsc,
                KeyCode::Tab => UiMsg::KeyTab,
                KeyCode::Up => UiMsg::KeyUp,
                KeyCode::Down => UiMsg::KeyDown,
                KeyCode::Char(ch) if ctrl => match ch {
                    'n' | 'N' => UiMsg::KeyDown,
                    'p' | 'P' => UiMsg::KeyUp,
                    'u' | 'U' => UiMsg::ClearInput,
                    'o' | 'O' => UiMsg::FocusOut,
                    'l' | 'L' => UiMsg::Click,
                    _ => return None,
                },
                KeyCode::Char(' ') => UiMsg::KeySpace,
                KeyCode::Char(ch) => UiMsg::Rune(*ch),
                _ => return None,
            };
            return self.dispatch(ui);
        }
        if let Some(ws) = msg.downcast_ref::<WindowSizeMsg>() {
            return self.dispatch(UiMsg::WindowSize {
                width: ws.width as usize,
                height: ws.height as usize,
            });
        }
        if let Some(LazyQueryMsg(query)) = msg.downcast_ref::<LazyQueryMsg>() {
            return self.dispatch(UiMsg::LazyQuery(query.clone()));
        }
        if let Some(TemplateRetryMsg(token)) = msg.downcast_ref::<TemplateRetryMsg>() {
            return self.dispatch(UiMsg::TemplateRetry(*token));
        }
        None
    }

    fn view(&self) -> String {
        self.inner.render_full()
    }
}

/// Run the interactive chooser until a value is committed or the user quits.
pub async fn run(launch: Launch) -> Result<Outcome> {
    launch.default_option()?;
    LAUNCH
        .set(launch)
        .map_err(|_| SuggestError::Program("program already launched".to_string()))?;

    let builder = Program::<TeaAdapter>::builder()
        .alt_screen(true)
        .signal_handler(true);
    let program = builder
        .build()
        .map_err(|e| SuggestError::Program(format!("failed to build program: {e:?}")))?;
    let mut final_adapter = program
        .run()
        .await
        .map_err(|e| SuggestError::Program(format!("program error: {e:?}")))?;

    final_adapter.inner.ctl.dispose();
    Ok(match final_adapter.inner.exit_value.take() {
        Some(v) => Outcome::Committed(v),
        None => Outcome::Cancelled,
    })
}
