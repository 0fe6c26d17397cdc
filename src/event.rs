use std::thread;

use crossbeam::channel::{self, Receiver};
use crossterm::event::{Event, KeyEvent, MouseEvent};
use tracing::{debug, error};

/// Terminal input the backend reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Resize(u16, u16),
}

impl TermEvent {
    /// Focus changes are dropped.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(TermEvent::Key(key)),
            Event::Mouse(mouse) => Some(TermEvent::Mouse(mouse)),
            Event::Paste(text) => Some(TermEvent::Paste(text)),
            Event::Resize(width, height) => Some(TermEvent::Resize(width, height)),
            Event::FocusGained | Event::FocusLost => None,
        }
    }
}

/// Reads terminal events on a background thread. The channel disconnects
/// when reading fails or the receiver is dropped.
pub fn spawn_input_reader() -> Receiver<TermEvent> {
    let (sender, receiver) = channel::unbounded();
    thread::spawn(move || {
        loop {
            let event = match crossterm::event::read() {
                Ok(event) => event,
                Err(err) => {
                    error!("reading terminal input failed: {err}");
                    break;
                }
            };
            let Some(event) = TermEvent::from_crossterm(event) else {
                continue;
            };
            if sender.send(event).is_err() {
                debug!("input receiver dropped, reader exiting");
                break;
            }
        }
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_focus_events_are_dropped() {
        assert_eq!(TermEvent::from_crossterm(Event::FocusGained), None);
        let key = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(
            TermEvent::from_crossterm(Event::Key(key)),
            Some(TermEvent::Key(key))
        );
    }
}
