//! Fixed zero-filled payload, materialized once per sender and retransmitted.

use std::{io, net::TcpStream};

#[cfg(target_os = "linux")]
pub use self::memfd::Payload;
#[cfg(not(target_os = "linux"))]
pub use self::buffered::Payload;

#[cfg(target_os = "linux")]
mod memfd {
    use std::fs::File;

    use nix::{
        errno::Errno,
        libc::off_t,
        sys::{
            memfd::{memfd_create, MemFdCreateFlag},
            sendfile::sendfile,
        },
    };

    use super::*;

    /// Anonymous in-memory file handed to the kernel with `sendfile`.
    #[derive(Debug)]
    pub struct Payload {
        file: File,
        len: usize,
    }

    impl Payload {
        pub fn zeroed(len: usize) -> io::Result<Self> {
            let file = File::from(memfd_create(c"flood-payload", MemFdCreateFlag::MFD_CLOEXEC)?);
            file.set_len(len as u64)?;

            Ok(Self { file, len })
        }

        pub fn len(&self) -> usize {
            self.len
        }

        pub fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// Blocks until the whole payload has been handed to the socket.
        pub fn transmit(&self, stream: &TcpStream) -> io::Result<()> {
            let mut offset: off_t = 0;

            while (offset as usize) < self.len {
                let remaining = self.len - offset as usize;

                match sendfile(stream, &self.file, Some(&mut offset), remaining) {
                    Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                    Ok(_) => {}
                    Err(Errno::EINTR) => continue,
                    Err(errno) => return Err(errno.into()),
                }
            }

            Ok(())
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod buffered {
    use std::io::Write;

    use derivative::Derivative;

    use super::*;

    #[derive(Derivative)]
    #[derivative(Debug)]
    pub struct Payload {
        #[derivative(Debug = "ignore")]
        buffer: Vec<u8>,
    }

    impl Payload {
        pub fn zeroed(len: usize) -> io::Result<Self> {
            Ok(Self {
                buffer: vec![0; len],
            })
        }

        pub fn len(&self) -> usize {
            self.buffer.len()
        }

        pub fn is_empty(&self) -> bool {
            self.buffer.is_empty()
        }

        pub fn transmit(&self, mut stream: &TcpStream) -> io::Result<()> {
            stream.write_all(&self.buffer)
        }
    }
}
