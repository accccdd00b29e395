#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Remote actuator panel adapter.
//!
//! Translates semantic [`ActuatorCue`] values into single-byte wire commands
//! for the LED, buzzer and servo on the remote panel. Each byte carries the
//! device kind in the high nibble and the value in the low nibble.

use std::{
    io::{self, Write},
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use motion_maze_core::ActuatorCue;
use motion_maze_engine::ActuatorLink;
use thiserror::Error;
use tracing::{debug, warn};

const LED_KIND: u8 = 1;
const BUZZER_KIND: u8 = 2;
const SERVO_KIND: u8 = 3;

const MAX_LED_COLOR: u8 = 7;
const MIN_BUZZER_TONE: u8 = 1;
const MAX_BUZZER_TONE: u8 = 5;
const MAX_SERVO_POSITION: u8 = 15;

/// Errors raised while encoding or delivering wire commands.
#[derive(Debug, Error)]
pub enum WireError {
    /// The value does not fit the device's range.
    #[error("{device} value {value} is outside {min}..={max}")]
    OutOfRange {
        /// Device the value was meant for.
        device: &'static str,
        /// Rejected value.
        value: u8,
        /// Smallest accepted value.
        min: u8,
        /// Largest accepted value.
        max: u8,
    },
    /// The high nibble does not name a known device.
    #[error("unknown device kind {0} in wire byte")]
    UnknownKind(u8),
    /// The sink rejected a write.
    #[error("failed to write to the actuator sink")]
    Io(#[from] io::Error),
    /// The writer thread panicked.
    #[error("actuator writer terminated unexpectedly")]
    WriterPanicked,
}

/// Single command understood by the remote panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireCommand {
    /// Sets the LED colour, `0..=7`.
    Led(u8),
    /// Plays a buzzer tone, `1..=5`.
    Buzzer(u8),
    /// Moves the servo, `0..=15`.
    Servo(u8),
}

impl WireCommand {
    /// LED command with a validated colour.
    pub fn led(color: u8) -> Result<Self, WireError> {
        check_range("led", color, 0, MAX_LED_COLOR).map(Self::Led)
    }

    /// Buzzer command with a validated tone.
    pub fn buzzer(tone: u8) -> Result<Self, WireError> {
        check_range("buzzer", tone, MIN_BUZZER_TONE, MAX_BUZZER_TONE).map(Self::Buzzer)
    }

    /// Servo command with a validated position.
    pub fn servo(position: u8) -> Result<Self, WireError> {
        check_range("servo", position, 0, MAX_SERVO_POSITION).map(Self::Servo)
    }

    /// Encodes the command as `(kind << 4) | (value & 0x0F)`.
    #[must_use]
    pub const fn encode(self) -> u8 {
        let (kind, value) = match self {
            Self::Led(color) => (LED_KIND, color),
            Self::Buzzer(tone) => (BUZZER_KIND, tone),
            Self::Servo(position) => (SERVO_KIND, position),
        };
        (kind << 4) | (value & 0x0F)
    }

    /// Decodes a wire byte produced by [`WireCommand::encode`].
    pub fn decode(byte: u8) -> Result<Self, WireError> {
        let value = byte & 0x0F;
        match byte >> 4 {
            LED_KIND => Self::led(value),
            BUZZER_KIND => Self::buzzer(value),
            SERVO_KIND => Self::servo(value),
            kind => Err(WireError::UnknownKind(kind)),
        }
    }
}

fn check_range(device: &'static str, value: u8, min: u8, max: u8) -> Result<u8, WireError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(WireError::OutOfRange {
            device,
            value,
            min,
            max,
        })
    }
}

/// Panel commands played for a cue, in order.
#[must_use]
pub fn sequence_for(cue: ActuatorCue) -> Vec<WireCommand> {
    use WireCommand::{Buzzer, Led, Servo};

    match cue {
        ActuatorCue::GameStarted => vec![Led(1), Buzzer(3), Servo(7)],
        ActuatorCue::Playing => vec![Led(1), Servo(7)],
        ActuatorCue::Collision => vec![Led(0), Buzzer(1), Led(7)],
        ActuatorCue::PowerUpCollected => vec![Led(3), Buzzer(2), Servo(12)],
        ActuatorCue::PowerUpSpawned { servo } => vec![Servo(servo & MAX_SERVO_POSITION)],
        ActuatorCue::ObstacleSpawned { servo } => {
            vec![Led(0), Servo(servo & MAX_SERVO_POSITION), Led(7)]
        }
        ActuatorCue::LevelCompleted => vec![Led(2), Buzzer(4), Servo(15)],
        ActuatorCue::GameOver => vec![Led(0), Buzzer(5), Servo(0)],
        ActuatorCue::ButtonAcknowledged => vec![Servo(10)],
        ActuatorCue::MotionAcknowledged => vec![Led(6), Led(7), Servo(3)],
    }
}

/// Actuator link that streams wire bytes to a sink on a writer thread.
///
/// Dispatch never blocks; delivery failures are logged and dropped. Dropping
/// the panel drains the queued bytes before returning.
#[derive(Debug)]
pub struct Panel {
    sender: Option<Sender<u8>>,
    writer: Option<JoinHandle<Result<(), WireError>>>,
}

impl Panel {
    /// Starts a writer thread that owns `sink`.
    pub fn spawn<W>(mut sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<u8>();
        let writer = thread::spawn(move || -> Result<(), WireError> {
            for byte in receiver {
                debug!(
                    byte = format_args!("{byte:#04x}"),
                    command = ?WireCommand::decode(byte).ok(),
                    "actuator_byte"
                );
                sink.write_all(&[byte])?;
                sink.flush()?;
            }
            Ok(())
        });
        Self {
            sender: Some(sender),
            writer: Some(writer),
        }
    }

    /// Stops the writer after it drains the queued bytes.
    pub fn close(mut self) -> Result<(), WireError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<(), WireError> {
        drop(self.sender.take());
        match self.writer.take() {
            Some(writer) => writer.join().map_err(|_| WireError::WriterPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        if let Err(error) = self.finish() {
            warn!(%error, "actuator_close_failed");
        }
    }
}

impl ActuatorLink for Panel {
    fn dispatch(&mut self, cue: ActuatorCue) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        for command in sequence_for(cue) {
            if sender.send(command.encode()).is_err() {
                warn!(?cue, "actuator_send_failed");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("sink lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn encodes_kind_and_value_nibbles() {
        assert_eq!(WireCommand::Led(7).encode(), 0x17);
        assert_eq!(WireCommand::Buzzer(3).encode(), 0x23);
        assert_eq!(WireCommand::Servo(15).encode(), 0x3f);
        assert_eq!(WireCommand::Servo(0).encode(), 0x30);
    }

    #[test]
    fn constructors_reject_out_of_range_values() {
        assert!(WireCommand::led(8).is_err());
        assert!(WireCommand::buzzer(0).is_err());
        assert!(WireCommand::buzzer(6).is_err());
        assert!(WireCommand::servo(16).is_err());
        assert_eq!(WireCommand::servo(12).expect("servo"), WireCommand::Servo(12));
    }

    #[test]
    fn decode_inverts_encode() {
        for cue in [
            ActuatorCue::GameStarted,
            ActuatorCue::Collision,
            ActuatorCue::MotionAcknowledged,
            ActuatorCue::ObstacleSpawned { servo: 9 },
        ] {
            for command in sequence_for(cue) {
                assert_eq!(WireCommand::decode(command.encode()).expect("decode"), command);
            }
        }
        assert!(matches!(WireCommand::decode(0x42), Err(WireError::UnknownKind(4))));
    }

    #[test]
    fn spawn_cues_carry_the_servo_position() {
        assert_eq!(
            sequence_for(ActuatorCue::PowerUpSpawned { servo: 5 }),
            vec![WireCommand::Servo(5)]
        );
        assert_eq!(
            sequence_for(ActuatorCue::ObstacleSpawned { servo: 11 }),
            vec![WireCommand::Led(0), WireCommand::Servo(11), WireCommand::Led(7)]
        );
    }

    #[test]
    fn panel_streams_cue_bytes_in_order() {
        let sink = SharedSink::default();
        let mut panel = Panel::spawn(sink.clone());

        panel.dispatch(ActuatorCue::GameStarted);
        panel.dispatch(ActuatorCue::ButtonAcknowledged);
        panel.close().expect("close");

        assert_eq!(
            *sink.0.lock().expect("sink lock"),
            vec![0x11, 0x23, 0x37, 0x3a]
        );
    }

    #[test]
    fn dropping_the_panel_drains_queued_bytes() {
        let sink = SharedSink::default();
        let mut panel = Panel::spawn(sink.clone());

        for _ in 0..50 {
            panel.dispatch(ActuatorCue::Collision);
        }
        drop(panel);

        let written = sink.0.lock().expect("sink lock");
        assert_eq!(written.len(), 150);
        assert_eq!(&written[..3], &[0x10, 0x21, 0x17]);
    }
}
