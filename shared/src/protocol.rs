use std::io::{self, Read, Write};

use zerocopy::{
    byteorder::{BigEndian, I16},
    AsBytes, FromBytes, FromZeroes, Unaligned,
};

use crate::error::{FloodError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Init = 0,
    Start = 1,
    End = 2,
}

impl Command {
    /// Size of the fixed frame that carries this command.
    pub const fn frame_len(self) -> usize {
        match self {
            Command::Init => std::mem::size_of::<InitFrame>(),
            Command::Start | Command::End => std::mem::size_of::<CommandFrame>(),
        }
    }
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
struct InitFrame {
    tag: u8,
    num_streams: I16<BigEndian>,
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
struct CommandFrame {
    tag: u8,
}

const MAX_FRAME_LEN: usize = std::mem::size_of::<InitFrame>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    Init { num_streams: i16 },
    Start,
    End,
}

impl ControlMessage {
    pub fn command(&self) -> Command {
        match self {
            ControlMessage::Init { .. } => Command::Init,
            ControlMessage::Start => Command::Start,
            ControlMessage::End => Command::End,
        }
    }

    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        match *self {
            ControlMessage::Init { num_streams } => {
                let frame = InitFrame {
                    tag: Command::Init as u8,
                    num_streams: I16::new(num_streams),
                };
                writer.write_all(frame.as_bytes())?;
            }
            ControlMessage::Start | ControlMessage::End => {
                let frame = CommandFrame {
                    tag: self.command() as u8,
                };
                writer.write_all(frame.as_bytes())?;
            }
        }

        writer.flush()
    }

    /// Decodes one frame that must carry `expected`.
    ///
    /// `bytes` must hold the whole frame; anything shorter is a short read.
    pub fn decode(bytes: &[u8], expected: Command) -> Result<Self> {
        match expected {
            Command::Init => Ok(ControlMessage::Init {
                num_streams: Self::decode_init(bytes)?,
            }),
            Command::Start | Command::End => {
                check_frame(bytes, expected)?;
                Ok(if expected == Command::Start {
                    ControlMessage::Start
                } else {
                    ControlMessage::End
                })
            }
        }
    }

    /// Decodes an INIT frame down to its stream count.
    pub fn decode_init(bytes: &[u8]) -> Result<i16> {
        let len = check_frame(bytes, Command::Init)?;

        InitFrame::read_from(&bytes[..len])
            .map(|frame| frame.num_streams.get())
            .ok_or(FloodError::ShortRead {
                expected: len,
                received: bytes.len(),
            })
    }

    /// Reads exactly one frame with a single `read` call. There is no retry
    /// on a partial read.
    pub fn read_from(mut reader: impl Read, expected: Command) -> Result<Self> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let received = reader.read(&mut buf[..expected.frame_len()])?;

        Self::decode(&buf[..received], expected)
    }

    /// Reads the INIT frame that opens a session and returns its stream count.
    pub fn read_init(mut reader: impl Read) -> Result<i16> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let received = reader.read(&mut buf[..Command::Init.frame_len()])?;

        Self::decode_init(&buf[..received])
    }
}

// Tag first, so a wrong command is reported as such even when it is short.
fn check_frame(bytes: &[u8], expected: Command) -> Result<usize> {
    let len = expected.frame_len();

    if let Some(&found) = bytes.first() {
        if found != expected as u8 {
            return Err(FloodError::UnexpectedCommand { expected, found });
        }
    }

    if bytes.len() < len {
        return Err(FloodError::ShortRead {
            expected: len,
            received: bytes.len(),
        });
    }

    Ok(len)
}
