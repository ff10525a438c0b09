//! Demo Mode - Simulated cooling controller for testing
//!
//! Generates a plausible liquid-nitrogen cooldown without real hardware:
//! temperatures relax from room temperature toward the bath temperature, with
//! small sensor noise and an occasional refill that briefly warms the stage.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::controller::{COMMAND_TERMINATOR, STATUS_COMMAND};

/// Starting temperature of every sensor (°C)
const AMBIENT_C: f64 = 20.0;
/// Liquid nitrogen bath temperature (°C)
const BATH_C: f64 = -196.0;
/// Cooldown time constant of the stage (seconds)
const STAGE_TAU_S: f64 = 900.0;
/// Duration of a refill (ms)
const REFILL_MS: u64 = 30_000;

/// One set of simulated sensor readings (°C)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoReading {
    /// Stage temperature
    pub t1: f64,
    /// Shield temperature
    pub s1: f64,
    /// Cold head temperature
    pub c1: f64,
    /// Secondary stage temperature
    pub t2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RefillState {
    /// Normal cooldown
    Idle,
    /// Refill in progress, stage warming slightly
    Refilling { start_ms: u64 },
}

/// Simulated cooling controller
pub struct DemoCooler {
    /// Current refill state
    refill_state: RefillState,
    /// Time of next refill (ms from start)
    next_refill_at_ms: u64,
    /// Random number generator
    rng: StdRng,
}

impl Default for DemoCooler {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCooler {
    /// Create a simulator seeded from entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a reproducible simulator
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let first_refill = rng.gen_range(240_000..420_000);
        Self {
            refill_state: RefillState::Idle,
            next_refill_at_ms: first_refill,
            rng,
        }
    }

    /// Sensor readings `elapsed_ms` after the cooldown started
    pub fn reading(&mut self, elapsed_ms: u64) -> DemoReading {
        self.update_refill_state(elapsed_ms);

        let t = elapsed_ms as f64 / 1000.0;
        let relax = |tau: f64| BATH_C + (AMBIENT_C - BATH_C) * (-t / tau).exp();

        let bump = match self.refill_state {
            RefillState::Idle => 0.0,
            RefillState::Refilling { start_ms } => {
                let progress = elapsed_ms.saturating_sub(start_ms) as f64 / REFILL_MS as f64;
                4.0 * (progress * std::f64::consts::PI).sin()
            }
        };

        DemoReading {
            t1: relax(STAGE_TAU_S) + bump + self.noise(0.05),
            s1: relax(STAGE_TAU_S * 1.8) + self.noise(0.05),
            c1: relax(STAGE_TAU_S * 0.6) + bump * 0.5 + self.noise(0.02),
            t2: relax(STAGE_TAU_S * 1.2) + self.noise(0.05),
        }
    }

    /// Status response as the controller would send it: CRLF lines separated
    /// by blank lines.
    pub fn status_response(&mut self, elapsed_ms: u64) -> String {
        let r = self.reading(elapsed_ms);
        format!(
            "T1 {:.2}{nl}{nl}S1 {:.2}{nl}{nl}C1 {:.2}{nl}{nl}T2 {:.2}{nl}",
            r.t1,
            r.s1,
            r.c1,
            r.t2,
            nl = COMMAND_TERMINATOR
        )
    }

    /// Answer controller commands on `listener` until accepting fails.
    ///
    /// Connections are served one at a time. `PTC` gets a status response;
    /// any other command is acknowledged with `OK`.
    pub async fn serve(mut self, listener: TcpListener) -> std::io::Result<()> {
        let started = Instant::now();
        loop {
            let (stream, peer) = listener.accept().await?;
            tracing::info!("Demo controller accepted {}", peer);
            if let Err(e) = self.handle(stream, started).await {
                tracing::warn!("Demo controller connection ended: {}", e);
            }
        }
    }

    async fn handle(&mut self, stream: TcpStream, started: Instant) -> std::io::Result<()> {
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        while let Some(line) = lines.next_line().await? {
            let command = line.trim_end_matches('\r').trim();
            let reply = if command.eq_ignore_ascii_case(STATUS_COMMAND) {
                self.status_response(started.elapsed().as_millis() as u64)
            } else {
                tracing::debug!("Demo controller got command {:?}", command);
                format!("OK{}", COMMAND_TERMINATOR)
            };
            write.write_all(reply.as_bytes()).await?;
        }
        Ok(())
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.gen_range(-amplitude..=amplitude)
    }

    /// Update the refill state machine
    fn update_refill_state(&mut self, elapsed_ms: u64) {
        match self.refill_state {
            RefillState::Idle => {
                if elapsed_ms >= self.next_refill_at_ms {
                    self.refill_state = RefillState::Refilling {
                        start_ms: elapsed_ms,
                    };
                }
            }
            RefillState::Refilling { start_ms } => {
                if elapsed_ms >= start_ms + REFILL_MS {
                    self.refill_state = RefillState::Idle;
                    self.next_refill_at_ms = elapsed_ms + self.rng.gen_range(240_000..420_000);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::clean_response;

    #[test]
    fn test_cooldown_trend() {
        let mut cooler = DemoCooler::with_seed(7);
        let start = cooler.reading(0);
        assert!((start.t1 - AMBIENT_C).abs() < 0.1);

        let later = cooler.reading(600_000);
        assert!(later.t1 < start.t1 - 50.0, "stage should cool: {:?}", later);
        assert!(later.t1 > BATH_C);
    }

    #[test]
    fn test_status_response_shape() {
        let mut cooler = DemoCooler::with_seed(1);
        let lines = clean_response(cooler.status_response(0).as_bytes());
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("T1 "));
        assert!(lines[1].starts_with("S1 "));
        assert!(lines[2].starts_with("C1 "));
        assert!(lines[3].starts_with("T2 "));
    }
}
