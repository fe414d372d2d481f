//! Input collaborators polled by the driver once per frame.

use crossbeam_channel::{Receiver, TryRecvError};
use smallvec::SmallVec;

/// A discrete user input observed during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Request a flap.
    Flap,
    /// Request that the driver stop.
    Quit,
    /// Any other input; ignored by the driver.
    Other,
}

/// Per-frame event buffer. Frames rarely carry more than a few events.
pub type InputBuffer = SmallVec<[InputEvent; 8]>;

/// Source of input events, polled once per frame by the driver.
pub trait InputSource {
    /// Append every event observed since the previous poll to `out`.
    ///
    /// Must not block.
    fn poll(&mut self, out: &mut InputBuffer);
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn poll(&mut self, out: &mut InputBuffer) {
        (**self).poll(out)
    }
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn poll(&mut self, out: &mut InputBuffer) {
        (**self).poll(out)
    }
}

/// An [`InputSource`] fed from another thread through a channel.
///
/// When every sender is dropped the next poll yields a single
/// [`InputEvent::Quit`], after which the source stays silent.
#[derive(Debug)]
pub struct ChannelInput {
    rx: Receiver<InputEvent>,
    disconnected: bool,
}

impl ChannelInput {
    /// Wrap a receiver.
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self {
            rx,
            disconnected: false,
        }
    }

    /// Create an unbounded channel and return the sender with its source.
    pub fn unbounded() -> (crossbeam_channel::Sender<InputEvent>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Self::new(rx))
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, out: &mut InputBuffer) {
        if self.disconnected {
            return;
        }
        loop {
            match self.rx.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    out.push(InputEvent::Quit);
                    break;
                }
            }
        }
    }
}
