//! A2UI Host
//!
//! Connects a message source and an outbound action channel to a
//! [`Processor`]. Sources run on their own thread and hand decoded messages
//! over a channel; the host applies them in arrival order whenever it is
//! polled, so the processor itself stays single-threaded.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::action::UserAction;
use super::error::{BridgeError, Result};
use super::message::Message;
use super::processor::Processor;
use super::stream::{read_messages, StreamFormat};

/// Events delivered to the host by a message source
#[derive(Debug)]
pub enum HostEvent {
    /// Received A2UI message
    Message(Message),
    /// The source failed to decode or read something
    Error(BridgeError),
    /// The source has ended
    Disconnected,
}

/// Drives a [`Processor`] from a channel of [`HostEvent`]s.
pub struct A2uiHost {
    processor: Processor,
    event_receiver: Option<Receiver<HostEvent>>,
    action_sender: Sender<UserAction>,
    is_connected: bool,
}

impl A2uiHost {
    /// Create a host reading `events` and sending user actions on `actions`
    pub fn new(
        processor: Processor,
        events: Receiver<HostEvent>,
        actions: Sender<UserAction>,
    ) -> Self {
        A2uiHost {
            processor,
            event_receiver: Some(events),
            action_sender: actions,
            is_connected: true,
        }
    }

    /// Read `reader` on a background thread, decoding it with `format`.
    pub fn spawn_reader<R>(reader: R, format: StreamFormat) -> Receiver<HostEvent>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            read_messages(reader, format, |item| {
                let event = match item {
                    Ok(message) => HostEvent::Message(message),
                    Err(e) => HostEvent::Error(e),
                };
                // Receiver dropped, stop reading
                tx.send(event).is_ok()
            });
            let _ = tx.send(HostEvent::Disconnected);
        });

        rx
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut Processor {
        &mut self.processor
    }

    /// Give the processor back, dropping the channels
    pub fn into_processor(self) -> Processor {
        self.processor
    }

    /// Check if the source is still connected
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    /// Handle the next pending event, if any (non-blocking).
    ///
    /// Messages are applied to the processor before the event is returned.
    pub fn poll(&mut self) -> Option<HostEvent> {
        let rx = self.event_receiver.as_ref()?;
        let event = match rx.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => HostEvent::Disconnected,
        };
        self.handle(&event);
        Some(event)
    }

    /// Poll all pending events
    pub fn poll_all(&mut self) -> Vec<HostEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.poll() {
            events.push(event);
        }
        events
    }

    /// Block until the source disconnects, applying every message.
    ///
    /// Returns the number of messages applied.
    pub fn run_to_end(&mut self) -> usize {
        let mut applied = 0;
        while let Some(rx) = self.event_receiver.as_ref() {
            let event = rx.recv().unwrap_or(HostEvent::Disconnected);
            if matches!(event, HostEvent::Message(_)) {
                applied += 1;
            }
            self.handle(&event);
        }
        applied
    }

    /// Send a user action upstream
    pub fn send_action(&self, action: UserAction) -> Result<()> {
        self.action_sender
            .send(action)
            .map_err(|_| BridgeError::ChannelClosed)
    }

    /// Dispatch a component's action and send it upstream.
    ///
    /// Returns `false` when the component has no action to send.
    pub fn trigger(&self, surface_id: &str, component_id: &str) -> Result<bool> {
        match self.processor.dispatch(surface_id, component_id) {
            Some(action) => self.send_action(action).map(|_| true),
            None => Ok(false),
        }
    }

    fn handle(&mut self, event: &HostEvent) {
        match event {
            HostEvent::Message(message) => {
                self.processor.process(message.clone());
            }
            HostEvent::Error(e) => {
                log::warn!("[A2UI host] Source error: {}", e);
            }
            HostEvent::Disconnected => {
                log::debug!("[A2UI host] Source disconnected");
                self.is_connected = false;
                // Clear receiver to prevent returning Disconnected repeatedly
                self.event_receiver = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> (A2uiHost, Sender<HostEvent>, Receiver<UserAction>) {
        let (event_tx, event_rx) = mpsc::channel();
        let (action_tx, action_rx) = mpsc::channel();
        let host = A2uiHost::new(Processor::with_standard_catalog(), event_rx, action_tx);
        (host, event_tx, action_rx)
    }

    fn message(json: &str) -> HostEvent {
        HostEvent::Message(Message::from_json(json).unwrap())
    }

    #[test]
    fn test_poll_applies_messages_in_order() {
        let (mut host, tx, _actions) = host();
        assert!(host.poll().is_none());

        tx.send(message(r#"{"beginRendering": {"surfaceId": "s", "root": "a"}}"#)).unwrap();
        tx.send(message(r#"{"beginRendering": {"surfaceId": "s", "root": "b"}}"#)).unwrap();

        assert_eq!(host.poll_all().len(), 2);
        let snapshot = host.processor().current_snapshot("s").unwrap();
        assert_eq!(snapshot.root(), Some("b"));
        assert!(host.is_connected());
    }

    #[test]
    fn test_disconnect_is_reported_once() {
        let (mut host, tx, _actions) = host();
        drop(tx);

        assert!(matches!(host.poll(), Some(HostEvent::Disconnected)));
        assert!(host.poll().is_none());
        assert!(!host.is_connected());
    }

    #[test]
    fn test_trigger_sends_action() {
        let (mut host, tx, actions) = host();
        tx.send(message(
            r#"{"surfaceUpdate": {"surfaceId": "s", "components": [
                {"id": "btn", "component": {"Button": {"action": {"name": "go"}}}},
                {"id": "txt", "component": {"Text": {"text": "hi"}}}
            ]}}"#,
        ))
        .unwrap();
        host.poll_all();

        assert!(host.trigger("s", "btn").unwrap());
        assert!(!host.trigger("s", "txt").unwrap());
        assert_eq!(actions.try_recv().unwrap().action_name, "go");

        drop(actions);
        assert!(matches!(
            host.trigger("s", "btn"),
            Err(BridgeError::ChannelClosed)
        ));
    }

    #[test]
    fn test_spawn_reader() {
        let input = concat!(
            "{\"beginRendering\": {\"surfaceId\": \"s\", \"root\": \"r\"}}\n",
            "{broken\n",
            "{\"deleteSurface\": {\"surfaceId\": \"s\"}}\n",
        );
        let events = A2uiHost::spawn_reader(input.as_bytes(), StreamFormat::Jsonl);
        let (actions, _rx) = mpsc::channel();
        let mut host = A2uiHost::new(Processor::with_standard_catalog(), events, actions);

        assert_eq!(host.run_to_end(), 2);
        assert!(!host.is_connected());
        assert!(host.processor().current_snapshot("s").is_none());
    }
}
