//! Command queue between input sources and the engine.
//!
//! Producers hold a cloneable [`CommandSender`] and may live on any thread.
//! The engine owns the receiving end and drains it between ticks.

use std::sync::mpsc;

use crate::types::Command;

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<Command>,
}

impl CommandSender {
    /// Queue a command. Returns false once the engine has been dropped.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

#[derive(Debug)]
pub struct CommandQueue {
    tx: mpsc::Sender<Command>,
    rx: mpsc::Receiver<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Next pending command, without blocking.
    pub fn try_recv(&self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
