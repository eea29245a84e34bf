//! Pointer-nudge capability.
//!
//! On Windows the pointer is moved with `SendInput` (relative
//! `MOUSEEVENTF_MOVE`). Other platforms get the dry-run nudger, which only
//! logs the offsets.

use crate::error::NudgeError;

/// Moves the pointer by a relative offset.
pub trait PointerNudger: Send {
    fn nudge(&mut self, dx: i32, dy: i32) -> Result<(), NudgeError>;

    /// Name shown in logs.
    fn name(&self) -> &'static str;
}

/// Logs offsets without touching the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNudger;

impl PointerNudger for DryRunNudger {
    fn nudge(&mut self, dx: i32, dy: i32) -> Result<(), NudgeError> {
        tracing::debug!(dx, dy, "dry-run nudge");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(windows)]
pub use send_input::SendInputNudger;

#[cfg(windows)]
mod send_input {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_MOVE, MOUSEINPUT,
    };

    use super::PointerNudger;
    use crate::error::NudgeError;

    /// Relative mouse moves through `SendInput`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SendInputNudger;

    impl PointerNudger for SendInputNudger {
        fn nudge(&mut self, dx: i32, dy: i32) -> Result<(), NudgeError> {
            let input = INPUT {
                r#type: INPUT_MOUSE,
                Anonymous: INPUT_0 {
                    mi: MOUSEINPUT {
                        dx,
                        dy,
                        mouseData: 0,
                        dwFlags: MOUSEEVENTF_MOVE,
                        time: 0,
                        dwExtraInfo: 0,
                    },
                },
            };
            // SAFETY: `input` is a fully initialised MOUSEINPUT and the size
            // passed matches the element type of the slice.
            let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
            if sent != 1 {
                let err = windows::core::Error::from_win32();
                return Err(NudgeError::Rejected(err.to_string()));
            }
            tracing::debug!(dx, dy, "pointer nudged");
            Ok(())
        }

        fn name(&self) -> &'static str {
            "send-input"
        }
    }
}

/// The real nudger for this platform, or the dry-run one when `dry_run` is
/// set or the platform has none.
pub fn platform_nudger(dry_run: bool) -> Box<dyn PointerNudger> {
    if dry_run {
        return Box::new(DryRunNudger);
    }

    #[cfg(windows)]
    {
        Box::new(SendInputNudger)
    }

    #[cfg(not(windows))]
    {
        tracing::info!("no pointer injection on this platform, falling back to dry-run");
        Box::new(DryRunNudger)
    }
}
