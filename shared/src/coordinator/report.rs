use std::{fmt::Display, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

/// Totals of one finished session, as seen from one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    pub role: Role,
    pub streams: i16,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl SessionReport {
    pub fn gigabytes(&self) -> f64 {
        self.bytes as f64 / 1e9
    }

    pub fn bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes as f64 / secs
        } else {
            0.0
        }
    }

    pub fn gigabits_per_sec(&self) -> f64 {
        self.bytes_per_sec() * 8.0 / 1e9
    }
}

impl Display for SessionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self.role {
            Role::Server => "received",
            Role::Client => "sent",
        };

        writeln!(
            f,
            "Total bytes {}: {:.3} GB ({} bytes over {} streams)",
            verb,
            self.gigabytes(),
            self.bytes,
            self.streams
        )?;
        write!(
            f,
            "Effective throughput: {:.3} Gbps ({:.0} bytes/s over {:.3} s)",
            self.gigabits_per_sec(),
            self.bytes_per_sec(),
            self.elapsed.as_secs_f64()
        )
    }
}
