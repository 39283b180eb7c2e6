// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reaction to device configuration changes.

use crate::application::ApplicationHandle;
use tether_core::capability::KEYBOARD;
use tether_core::request::{ConfigurationDescriptor, HardKeyboard};

/// What the keyboard capability was told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardNotice {
    /// `set_hardware_keyboard_open` was called.
    Opened,
    /// `set_hardware_keyboard_closed` was called.
    Closed,
}

/// Applies a configuration change.
///
/// Only the hardware keyboard field is inspected. If a keyboard capability is
/// registered it is told whether a keyboard is now open or closed; if none is
/// registered, or the field is undefined, nothing happens.
pub fn apply_configuration(
    app: &ApplicationHandle,
    config: &ConfigurationDescriptor,
) -> Option<KeyboardNotice> {
    let notice = match config.hard_keyboard {
        HardKeyboard::Visible => KeyboardNotice::Opened,
        HardKeyboard::Hidden => KeyboardNotice::Closed,
        HardKeyboard::Undefined => return None,
    };
    let Some(keyboard) = app.get_system(KEYBOARD) else {
        log::trace!("No keyboard capability registered; ignoring keyboard change.");
        return None;
    };
    match notice {
        KeyboardNotice::Opened => keyboard.set_hardware_keyboard_open(),
        KeyboardNotice::Closed => keyboard.set_hardware_keyboard_closed(),
    }
    log::debug!("Hardware keyboard {notice:?}.");
    Some(notice)
}
