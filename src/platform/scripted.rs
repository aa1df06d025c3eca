// ── Scripted window system (tests only) ───────────────────────────────────────
//
// An in-memory `WindowSystem` that replays a queue of messages and records
// every call made against it.  A handler returning `PostQuit` makes the quit
// message the very next retrieval, ahead of anything still queued.  The OS
// only hands out WM_QUIT once the posted messages have drained, so scripts
// that care about the difference must not queue messages after a destroy.

use std::collections::VecDeque;

use crate::{
    config::PumpMode,
    error::{JankError, Result},
    handler::{HandleMessage, Outcome},
    message::{Message, MessageKind, WindowHandle},
};

use super::{WindowClassDescriptor, WindowSpec, WindowSystem};

/// Handle value given to the created window.
pub(crate) const WINDOW_RAW: usize = 0x0001_0abc;

/// `ERROR_CANNOT_FIND_WND_CLASS`.
const CANNOT_FIND_CLASS: u32 = 1407;

/// One entry in the scripted queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pending {
    Message(Message),
    /// One empty poll (ignored by blocking waits).
    Empty,
}

/// A recorded call against the window system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Register(String),
    Create { title: String, width: i32, height: i32 },
    Show(WindowHandle),
    Retrieve,
    Translate(Message),
    Dispatch(Message),
    Alert(String),
}

#[derive(Default)]
pub(crate) struct ScriptedSystem {
    pub(crate) calls: Vec<Call>,
    queue: VecDeque<Pending>,
    class_name: Option<String>,
    handler: Option<Box<dyn HandleMessage>>,
    window: Option<WindowHandle>,
    fail_register: Option<u32>,
    fail_create: Option<u32>,
    fail_retrieve: Option<u32>,
}

impl ScriptedSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The handle the created window will receive.
    pub(crate) fn window() -> WindowHandle {
        WindowHandle::from_raw(WINDOW_RAW).expect("non-zero")
    }

    /// Queue a message for the (future) main window.
    pub(crate) fn push(mut self, kind: MessageKind) -> Self {
        self.queue
            .push_back(Pending::Message(Message::new(kind, Some(Self::window()))));
        self
    }

    pub(crate) fn push_message(mut self, message: Message) -> Self {
        self.queue.push_back(Pending::Message(message));
        self
    }

    pub(crate) fn push_empty(mut self) -> Self {
        self.queue.push_back(Pending::Empty);
        self
    }

    pub(crate) fn failing_register(mut self, code: u32) -> Self {
        self.fail_register = Some(code);
        self
    }

    pub(crate) fn failing_create(mut self, code: u32) -> Self {
        self.fail_create = Some(code);
        self
    }

    pub(crate) fn failing_retrieve(mut self, code: u32) -> Self {
        self.fail_retrieve = Some(code);
        self
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|&c| pred(c)).count()
    }

    pub(crate) fn dispatched(&self) -> Vec<Message> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Dispatch(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Alert(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl WindowSystem for ScriptedSystem {
    fn register_class(&mut self, class: WindowClassDescriptor) -> Result<()> {
        self.calls.push(Call::Register(class.class_name.clone()));
        if let Some(code) = self.fail_register {
            return Err(JankError::RegisterClass { code });
        }
        self.class_name = Some(class.class_name);
        self.handler = Some(class.handler);
        Ok(())
    }

    fn create_window(&mut self, spec: &WindowSpec<'_>) -> Result<WindowHandle> {
        self.calls.push(Call::Create {
            title: spec.title.to_owned(),
            width: spec.width,
            height: spec.height,
        });
        if let Some(code) = self.fail_create {
            return Err(JankError::CreateWindow { code });
        }
        if self.class_name.as_deref() != Some(spec.class_name) {
            return Err(JankError::CreateWindow {
                code: CANNOT_FIND_CLASS,
            });
        }
        let window = Self::window();
        self.window = Some(window);
        Ok(window)
    }

    fn show_window(&mut self, window: WindowHandle) {
        self.calls.push(Call::Show(window));
    }

    fn next_message(&mut self, mode: PumpMode) -> Result<Option<Message>> {
        self.calls.push(Call::Retrieve);
        if let Some(code) = self.fail_retrieve {
            return Err(JankError::MessageQueue { code });
        }
        loop {
            match self.queue.pop_front() {
                Some(Pending::Message(m)) => return Ok(Some(m)),
                Some(Pending::Empty) if mode == PumpMode::Poll => return Ok(None),
                Some(Pending::Empty) => continue,
                // A real blocking wait would hang here; fail the test instead.
                None => return Err(JankError::MessageQueue { code: u32::MAX }),
            }
        }
    }

    fn translate(&mut self, message: &Message) {
        self.calls.push(Call::Translate(*message));
    }

    fn dispatch(&mut self, message: &Message) {
        self.calls.push(Call::Dispatch(*message));
        if message.window.is_none() || message.window != self.window {
            return;
        }
        if let Some(handler) = self.handler.as_mut() {
            if let Outcome::PostQuit(code) = handler.handle(message) {
                self.queue.push_front(Pending::Message(Message::quit(code)));
            }
        }
    }

    fn alert(&mut self, text: &str) {
        self.calls.push(Call::Alert(text.to_owned()));
    }
}
