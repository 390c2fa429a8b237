use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.lookup`(...) for the entered postcode and address
    Lookup,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Enter, Esc, Left, Tab};

    // Global quit shortcut; `q` is text while an input has focus
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Tab {
        app.debug = !app.debug;
        return Action::None;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::PostcodeEntry | Screen::AddressEntry => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                    && let Some(input) = app.input_mut()
                {
                    input.push(character);
                }
            }
            Backspace => {
                if let Some(input) = app.input_mut() {
                    input.pop();
                }
            }
            Enter => {
                if app.screen == Screen::AddressEntry {
                    action = Action::Lookup;
                } else if app.postcode_input.trim().is_empty() {
                    app.error_message = Some("Type a postcode, then press Enter".into());
                } else {
                    app.error_message = None;
                    app.screen = Screen::AddressEntry;
                }
            }
            Esc => {
                if app.screen == Screen::AddressEntry {
                    app.screen = Screen::PostcodeEntry;
                } else {
                    action = Action::Quit;
                }
            }
            _ => {}
        },

        Screen::ScheduleView => match key.code {
            Char('q') => action = Action::Quit,
            Left | Esc | Char('b') => {
                app.error_message = None;
                app.screen = Screen::AddressEntry;
            }
            _ => {}
        },
    }
    action
}
