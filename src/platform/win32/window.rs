// ── Win32 window system ───────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the window class described by a `WindowClassDescriptor`.
//   • Create the top-level window and attach the message handler to it.
//   • Retrieve, translate and dispatch queue messages.
//   • Route window-procedure calls into the handler.
//   • Show modal alerts.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{GetStockObject, HBRUSH, NULL_BRUSH, WHITE_BRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
            GetMessageW, GetWindowLongPtrW, IsWindow, LoadCursorW, LoadIconW, MessageBoxW,
            PeekMessageW, PostQuitMessage, RegisterClassExW, SetWindowLongPtrW, ShowWindow,
            TranslateMessage, CREATESTRUCTW, CW_USEDEFAULT, GWLP_USERDATA, HCURSOR, HICON,
            HMENU, IDC_ARROW, IDI_APPLICATION, MB_ICONERROR, MB_OK, MSG, PM_REMOVE, SW_SHOW,
            WINDOW_EX_STYLE, WM_CREATE, WM_DESTROY, WM_NCCREATE, WM_NCDESTROY, WM_QUIT,
            WNDCLASSEXW, WNDCLASS_STYLES, WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::{
    config::{Background, PumpMode},
    error::{JankError, Result},
    handler::{HandleMessage, Outcome},
    message::{Message, MessageKind, WindowHandle},
    platform::{Cursor, IconSource, WindowClassDescriptor, WindowSpec, WindowSystem},
};

// ── Handler slot ──────────────────────────────────────────────────────────────

/// Heap cell the window procedure reaches through `GWLP_USERDATA`.
///
/// Owned by `Win32System` (allocated with `Box::into_raw`, freed in `Drop`);
/// the window only ever holds a borrowed pointer to it.
struct HandlerSlot {
    handler: Box<dyn HandleMessage>,
}

// ── Win32System ───────────────────────────────────────────────────────────────

/// `WindowSystem` backed by user32 on the calling thread.
pub(crate) struct Win32System {
    hinstance: HINSTANCE,
    /// UTF-16 name of the registered class, if any.
    class_name: Option<Vec<u16>>,
    slot: *mut HandlerSlot,
    window: Option<HWND>,
    /// Last raw message handed out by `next_message`, until dispatched.
    pending: Option<MSG>,
}

impl Win32System {
    pub(crate) fn new() -> Result<Self> {
        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
        // always valid for the process lifetime and never fails in practice.
        let hmodule = unsafe { GetModuleHandleW(None) }?;

        // HINSTANCE and HMODULE represent the same underlying value on Windows.
        Ok(Self {
            hinstance: HINSTANCE(hmodule.0),
            class_name: None,
            slot: std::ptr::null_mut(),
            window: None,
            pending: None,
        })
    }

    fn load_icon(&self, source: IconSource) -> Result<HICON> {
        if let IconSource::Resource(id) = source {
            // SAFETY: MAKEINTRESOURCEW — an integer id in the low word of the
            // name pointer is the documented way to name a numeric resource.
            // hinstance is the exe's module.
            match unsafe { LoadIconW(self.hinstance, PCWSTR(id as usize as *const u16)) } {
                Ok(icon) => return Ok(icon),
                Err(e) => {
                    log::warn!("icon resource {id} not found ({e}), using stock icon")
                }
            }
        }
        // SAFETY: LoadIconW with IDI_APPLICATION loads the built-in application
        // icon, which exists on all Windows versions.
        Ok(unsafe { LoadIconW(None, IDI_APPLICATION) }?)
    }

    fn load_cursor(cursor: Cursor) -> Result<HCURSOR> {
        let name = match cursor {
            Cursor::Arrow => IDC_ARROW,
        };
        // SAFETY: built-in cursor resource, guaranteed to exist.
        Ok(unsafe { LoadCursorW(None, name) }?)
    }

    fn brush(background: Background) -> HBRUSH {
        let stock = match background {
            Background::Null => NULL_BRUSH,
            Background::White => WHITE_BRUSH,
        };
        // SAFETY: GetStockObject with a stock brush id always returns a valid
        // HGDIOBJ; stock brush objects are compatible with HBRUSH.
        unsafe { HBRUSH(GetStockObject(stock).0) }
    }

    /// The raw record for `message`: the one retrieved from the queue when it
    /// matches, otherwise rebuilt from the message fields.
    fn raw(&self, message: &Message) -> MSG {
        let hwnd = hwnd_of(message.window);
        match self.pending {
            Some(msg)
                if msg.hwnd == hwnd
                    && msg.wParam.0 == message.param1
                    && msg.lParam.0 == message.param2
                    && kind_from_raw(msg.message) == message.kind =>
            {
                msg
            }
            _ => MSG {
                hwnd,
                message: raw_from_kind(message.kind),
                wParam: WPARAM(message.param1),
                lParam: LPARAM(message.param2),
                ..MSG::default()
            },
        }
    }
}

impl WindowSystem for Win32System {
    fn register_class(&mut self, class: WindowClassDescriptor) -> Result<()> {
        // The handler slot is shared with the live window; one class per system.
        if self.window.is_some() {
            return Err(JankError::RegisterClass {
                // ERROR_CLASS_ALREADY_EXISTS
                code: 1410,
            });
        }
        let icon = self.load_icon(class.icon)?;
        let cursor = Self::load_cursor(class.cursor)?;
        let name = wide(&class.class_name);

        let wndclass = WNDCLASSEXW {
            // WNDCLASSEXW is ~80 bytes; the cast to u32 is always lossless.
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: WNDCLASS_STYLES(class.style.bits()),
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: self.hinstance,
            hIcon: icon,
            hCursor: cursor,
            hbrBackground: Self::brush(class.background),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR(name.as_ptr()),
            hIconSm: icon,
        };

        // SAFETY: wndclass is fully initialised with valid handles; `name` is
        // a null-terminated UTF-16 buffer alive for the duration of the call.
        let atom = unsafe { RegisterClassExW(&wndclass) };
        if atom == 0 {
            return Err(JankError::RegisterClass { code: last_error_code() });
        }
        log::debug!("RegisterClassExW({:?}) -> atom {atom:#06x}", class.class_name);

        if !self.slot.is_null() {
            // SAFETY: slot came from Box::into_raw below and no window exists
            // yet (checked above), so nothing else points at it.
            drop(unsafe { Box::from_raw(self.slot) });
        }
        self.slot = Box::into_raw(Box::new(HandlerSlot {
            handler: class.handler,
        }));
        self.class_name = Some(name);
        Ok(())
    }

    fn create_window(&mut self, spec: &WindowSpec<'_>) -> Result<WindowHandle> {
        let class_name = match &self.class_name {
            Some(name) if *name == wide(spec.class_name) => name,
            _ => {
                return Err(JankError::CreateWindow {
                    // ERROR_CANNOT_FIND_WND_CLASS
                    code: 1407,
                })
            }
        };
        let title = wide(spec.title);

        // SAFETY: the class was just registered; hinstance is the exe's module.
        // HWND::default() (null parent) creates a top-level window; no menu.
        // lpParam carries the handler slot, picked up in WM_NCCREATE.  The
        // slot outlives the window (see Drop).
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                0,
                spec.width,
                spec.height,
                HWND::default(),
                HMENU::default(),
                self.hinstance,
                Some(self.slot as *const c_void),
            )
        }
        .map_err(|e| JankError::CreateWindow {
            code: e.code().0 as u32,
        })?;

        let handle = WindowHandle::from_raw(hwnd.0 as usize)
            .ok_or_else(|| JankError::CreateWindow { code: last_error_code() })?;
        log::debug!("CreateWindowExW -> {:#x}", handle.as_raw());
        self.window = Some(hwnd);
        Ok(handle)
    }

    fn show_window(&mut self, window: WindowHandle) {
        // SAFETY: window was returned by CreateWindowExW.  The return value is
        // the previous visibility state, not an error.
        unsafe {
            let _ = ShowWindow(hwnd_of(Some(window)), SW_SHOW);
        }
    }

    fn next_message(&mut self, mode: PumpMode) -> Result<Option<Message>> {
        let mut msg = MSG::default();

        match mode {
            PumpMode::Wait => {
                // SAFETY: &mut msg is a valid MSG pointer; HWND::default()
                // retrieves messages for all windows on this thread.
                let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
                // GetMessageW returns -1 on error, 0 for WM_QUIT (msg still
                // filled in), anything else for a normal message.
                if ret.0 == -1 {
                    return Err(JankError::MessageQueue { code: last_error_code() });
                }
            }
            PumpMode::Poll => {
                // SAFETY: as above; PeekMessageW does not block.
                let found = unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) };
                if !found.as_bool() {
                    return Ok(None);
                }
            }
        }

        let message = Message {
            kind: kind_from_raw(msg.message),
            window: WindowHandle::from_raw(msg.hwnd.0 as usize),
            param1: msg.wParam.0,
            param2: msg.lParam.0,
        };
        self.pending = Some(msg);
        Ok(Some(message))
    }

    fn translate(&mut self, message: &Message) {
        let msg = self.raw(message);
        // SAFETY: msg is a complete MSG record.  The return value only says
        // whether a character message was generated.
        unsafe {
            let _ = TranslateMessage(&msg);
        }
    }

    fn dispatch(&mut self, message: &Message) {
        let msg = self.raw(message);
        self.pending = None;
        // SAFETY: msg is a complete MSG record.  DispatchMessageW re-enters
        // wnd_proc on this thread; no borrow of self is held across it.
        unsafe {
            let _ = DispatchMessageW(&msg);
        }
    }

    fn alert(&mut self, text: &str) {
        let text = wide(text);
        // SAFETY: text is a valid null-terminated UTF-16 string that remains
        // allocated for the duration of the call.  A null caption shows the
        // default "Error" caption; a null owner makes the box top-level.
        unsafe {
            let _ = MessageBoxW(
                HWND::default(),
                PCWSTR(text.as_ptr()),
                PCWSTR::null(),
                MB_OK | MB_ICONERROR,
            );
        }
    }
}

impl Drop for Win32System {
    fn drop(&mut self) {
        if let Some(hwnd) = self.window.take() {
            // SAFETY: destroying our own window on its creating thread.  This
            // runs wnd_proc while the slot is still alive; WM_NCDESTROY then
            // unhooks the slot pointer.
            unsafe {
                if IsWindow(hwnd).as_bool() {
                    let _ = DestroyWindow(hwnd);
                }
            }
        }
        if !self.slot.is_null() {
            // SAFETY: slot came from Box::into_raw and no window refers to it
            // any more.
            drop(unsafe { Box::from_raw(self.slot) });
            self.slot = std::ptr::null_mut();
        }
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let slot = if msg == WM_NCCREATE {
        // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW built by
        // CreateWindowExW; lpCreateParams is the slot pointer we passed.
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        let slot = create.lpCreateParams as *mut HandlerSlot;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, slot as isize);
        slot
    } else {
        GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut HandlerSlot
    };

    // Messages sent before WM_NCCREATE (e.g. WM_GETMINMAXINFO) find no slot.
    if !slot.is_null() {
        let message = Message {
            kind: kind_from_raw(msg),
            window: WindowHandle::from_raw(hwnd.0 as usize),
            param1: wparam.0,
            param2: lparam.0,
        };
        // SAFETY: the slot is alive while the window exists (owned by
        // Win32System, which destroys the window before freeing it).  The
        // &mut ends before DefWindowProcW can re-enter.
        let outcome = (*slot).handler.handle(&message);
        if let Outcome::PostQuit(code) = outcome {
            PostQuitMessage(code);
        }
        if msg == WM_NCDESTROY {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
        }
    }

    // Every message also gets default processing.
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

// ── Conversions ───────────────────────────────────────────────────────────────

fn kind_from_raw(raw: u32) -> MessageKind {
    match raw {
        WM_CREATE => MessageKind::Create,
        WM_DESTROY => MessageKind::Destroy,
        WM_QUIT => MessageKind::Quit,
        other => MessageKind::Other(other),
    }
}

fn raw_from_kind(kind: MessageKind) -> u32 {
    match kind {
        MessageKind::Create => WM_CREATE,
        MessageKind::Destroy => WM_DESTROY,
        MessageKind::Quit => WM_QUIT,
        MessageKind::Other(raw) => raw,
    }
}

fn hwnd_of(window: Option<WindowHandle>) -> HWND {
    window.map_or(HWND::default(), |w| HWND(w.as_raw() as *mut c_void))
}

/// Null-terminated UTF-16 copy of `s`.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Capture the current Win32 last-error code.
///
/// Call immediately after a Win32 function that signals failure — `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error_code() -> u32 {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    unsafe { GetLastError() }.0
}
