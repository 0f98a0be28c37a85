//! Markov-modulated traffic generator
//!
//! A traffic source that alternates between two modes. Each mode has its
//! own inter-packet delay distribution; the time spent in a mode is drawn
//! from the modulation-interval distribution. Every firing:
//!
//! 1. flips the mode if the current modulation interval has elapsed and
//!    draws a new interval,
//! 2. draws a delay for the current mode and schedules the next firing,
//! 3. draws a packet size by rejection sampling (at least
//!    [`MIN_PACKET_SIZE`] bytes),
//! 4. sends one zero-filled payload of that size.
//!
//! [`MarkovTrafficGenerator::start`] forces mode 1 with a zero modulation
//! interval and fires synchronously, so the first firing always flips to
//! mode 2 and draws the first real interval.

use std::time::Duration;

use bytes::Bytes;
use csmarl_core::{
    ConfigError, EventId, Flow, NodeId, PacketSocket, SimTime, SocketFactory, Timer, TrafficError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::random::{RandomStream, RandomVariable, stream_seed};

/// Smallest packet a generator emits, in bytes
pub const MIN_PACKET_SIZE: u32 = 20;

/// Default number of size draws before giving up
pub const DEFAULT_MAX_SIZE_DRAWS: u32 = 1000;

/// Parameters of a Markov traffic generator
///
/// Delays and intervals are in seconds, sizes in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkovTrafficConfig {
    /// Inter-packet delay in mode 1
    pub mode1_delay: RandomVariable,
    /// Inter-packet delay in mode 2
    pub mode2_delay: RandomVariable,
    /// Time spent in a mode before switching
    pub modulation_interval: RandomVariable,
    /// Packet size
    pub packet_size: RandomVariable,
    /// Draws below this size are rejected
    pub min_packet_size: u32,
    /// Rejection-sampling budget per packet
    pub max_size_draws: u32,
}

impl Default for MarkovTrafficConfig {
    fn default() -> Self {
        Self {
            mode1_delay: RandomVariable::constant(1.0),
            mode2_delay: RandomVariable::constant(1.0),
            modulation_interval: RandomVariable::constant(1.0),
            packet_size: RandomVariable::constant(2000.0),
            min_packet_size: MIN_PACKET_SIZE,
            max_size_draws: DEFAULT_MAX_SIZE_DRAWS,
        }
    }
}

impl MarkovTrafficConfig {
    /// Reject parameters that can never produce valid traffic
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("mode1_delay", &self.mode1_delay),
            ("mode2_delay", &self.mode2_delay),
            ("modulation_interval", &self.modulation_interval),
        ];
        for (name, rv) in durations {
            rv.validate()?;
            if rv.lower_bound() < 0.0 {
                return Err(ConfigError::InvalidTraffic {
                    name,
                    reason: format!("{} can produce negative durations", rv),
                });
            }
            if Duration::try_from_secs_f64(rv.lower_bound()).is_err() {
                return Err(ConfigError::InvalidTraffic {
                    name,
                    reason: format!("{} never fits the simulated clock", rv),
                });
            }
        }

        self.packet_size.validate()?;
        if self.packet_size.max_integer() < self.min_packet_size as f64 {
            return Err(ConfigError::InvalidTraffic {
                name: "packet_size",
                reason: format!(
                    "{} never reaches the {} byte minimum",
                    self.packet_size, self.min_packet_size
                ),
            });
        }
        if self.max_size_draws == 0 {
            return Err(ConfigError::InvalidTraffic {
                name: "max_size_draws",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Traffic regime of a running generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficMode {
    One = 1,
    Two = 2,
}

impl TrafficMode {
    /// The other mode
    pub fn flipped(self) -> Self {
        match self {
            TrafficMode::One => TrafficMode::Two,
            TrafficMode::Two => TrafficMode::One,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Counters of one generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub firings: u64,
    pub packets_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
    pub mode_switches: u64,
    pub size_rejections: u64,
}

/// State that only exists while the generator runs
struct Running {
    mode: TrafficMode,
    last_switch: SimTime,
    /// Zero right after activation
    modulation_interval: Duration,
    socket: Box<dyn PacketSocket>,
    next: Option<EventId>,
}

/// A two-mode stochastic traffic source bound to one flow
pub struct MarkovTrafficGenerator {
    flow: Flow,
    min_packet_size: u32,
    max_size_draws: u32,
    mode1_delay: RandomStream,
    mode2_delay: RandomStream,
    modulation_interval: RandomStream,
    packet_size: RandomStream,
    running: Option<Running>,
    stats: TrafficStats,
}

impl MarkovTrafficGenerator {
    /// Create an inactive generator for `flow`
    ///
    /// `source` distinguishes generators sharing one `run_seed`; each of the
    /// four distributions gets its own stream.
    pub fn new(
        config: &MarkovTrafficConfig,
        flow: Flow,
        source: u32,
        run_seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let stream = |spec: &RandomVariable, index| {
            RandomStream::new(spec.clone(), stream_seed(run_seed, source, index))
        };

        Ok(Self {
            flow,
            min_packet_size: config.min_packet_size,
            max_size_draws: config.max_size_draws,
            mode1_delay: stream(&config.mode1_delay, 0)?,
            mode2_delay: stream(&config.mode2_delay, 1)?,
            modulation_interval: stream(&config.modulation_interval, 2)?,
            packet_size: stream(&config.packet_size, 3)?,
            running: None,
            stats: TrafficStats::default(),
        })
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current mode, `None` while inactive
    pub fn mode(&self) -> Option<TrafficMode> {
        self.running.as_ref().map(|r| r.mode)
    }

    /// Handle of the next scheduled firing
    pub fn pending_event(&self) -> Option<EventId> {
        self.running.as_ref().and_then(|r| r.next)
    }

    /// Time of the last mode switch (or of activation)
    pub fn last_switch(&self) -> Option<SimTime> {
        self.running.as_ref().map(|r| r.last_switch)
    }

    /// Currently drawn modulation interval
    pub fn modulation_interval(&self) -> Option<Duration> {
        self.running.as_ref().map(|r| r.modulation_interval)
    }

    pub fn stats(&self) -> TrafficStats {
        self.stats
    }

    /// Activate the generator
    ///
    /// Forces mode 1 with a zero modulation interval, resets the mode-switch
    /// clock to now, connects a socket from the flow's sender to its receiver,
    /// and fires once synchronously. That first firing flips to mode 2.
    pub fn start(
        &mut self,
        timer: &mut dyn Timer,
        sockets: &mut dyn SocketFactory,
    ) -> Result<(), TrafficError> {
        if self.running.is_some() {
            return Err(TrafficError::AlreadyRunning);
        }

        let socket = sockets.connect(self.flow.sender, self.flow.receiver)?;
        self.running = Some(Running {
            mode: TrafficMode::One,
            last_switch: timer.now(),
            modulation_interval: Duration::ZERO,
            socket,
            next: None,
        });
        debug!(flow = %self.flow, time = %timer.now(), "traffic generator started");

        self.fire(timer)
    }

    /// Deactivate the generator and cancel its pending firing
    ///
    /// Returns false if it was not running.
    pub fn stop(&mut self, timer: &mut dyn Timer) -> bool {
        let Some(mut running) = self.running.take() else {
            return false;
        };
        if let Some(next) = running.next.take() {
            timer.cancel(next);
        }
        running.socket.close();
        debug!(flow = %self.flow, time = %timer.now(), "traffic generator stopped");
        true
    }

    /// Handle one scheduled firing
    ///
    /// A failed send is logged and counted; it never stops the schedule.
    ///
    /// # Errors
    ///
    /// Fails if the generator is inactive, a negative delay is drawn, or the
    /// packet size cannot be drawn within the retry budget.
    pub fn fire(&mut self, timer: &mut dyn Timer) -> Result<(), TrafficError> {
        let now = timer.now();
        let running = self.running.as_mut().ok_or(TrafficError::NotRunning)?;
        self.stats.firings += 1;

        if now.since(running.last_switch) >= running.modulation_interval {
            running.mode = running.mode.flipped();
            running.modulation_interval =
                sample_duration(&mut self.modulation_interval, "modulation interval")?;
            running.last_switch = now;
            self.stats.mode_switches += 1;
            debug!(flow = %self.flow, mode = running.mode.number(), time = %now, "mode switch");
        }

        let delay = match running.mode {
            TrafficMode::One => sample_duration(&mut self.mode1_delay, "mode 1 delay")?,
            TrafficMode::Two => sample_duration(&mut self.mode2_delay, "mode 2 delay")?,
        };
        running.next = Some(timer.schedule(delay));

        let size = draw_packet_size(
            &mut self.packet_size,
            self.min_packet_size,
            self.max_size_draws,
            &mut self.stats,
        )?;

        let payload = Bytes::from(vec![0u8; size as usize]);
        match running.socket.send(payload) {
            Ok(bytes) => {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += bytes as u64;
                info!(
                    flow = %self.flow,
                    bytes,
                    time = now.as_secs_f64(),
                    "TraceDelay TX"
                );
            }
            Err(e) => {
                self.stats.send_failures += 1;
                warn!(flow = %self.flow, bytes = size, error = %e, "Error while sending");
            }
        }
        Ok(())
    }

    /// Sender node of the bound flow
    pub fn local(&self) -> NodeId {
        self.flow.sender
    }
}

impl std::fmt::Debug for MarkovTrafficGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkovTrafficGenerator")
            .field("flow", &self.flow)
            .field("mode", &self.mode())
            .field("stats", &self.stats)
            .finish()
    }
}

fn sample_duration(stream: &mut RandomStream, what: &'static str) -> Result<Duration, TrafficError> {
    let value = stream.value();
    if !(value >= 0.0) {
        return Err(TrafficError::NegativeDelay { what, value });
    }
    Duration::try_from_secs_f64(value).map_err(|_| TrafficError::DelayOutOfRange { what, value })
}

/// Draw sizes until one reaches `minimum`, giving up after `max_draws`
fn draw_packet_size(
    stream: &mut RandomStream,
    minimum: u32,
    max_draws: u32,
    stats: &mut TrafficStats,
) -> Result<u32, TrafficError> {
    for _ in 0..max_draws {
        let size = stream.integer();
        if size >= minimum {
            return Ok(size);
        }
        stats.size_rejections += 1;
    }
    Err(TrafficError::SizeRejectionExhausted {
        attempts: max_draws,
        minimum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use csmarl_core::MockSocketFactory;

    fn flow() -> Flow {
        Flow::new(NodeId(0), NodeId(1))
    }

    fn constant_config(d1: f64, d2: f64, modulation: f64, size: f64) -> MarkovTrafficConfig {
        MarkovTrafficConfig {
            mode1_delay: RandomVariable::constant(d1),
            mode2_delay: RandomVariable::constant(d2),
            modulation_interval: RandomVariable::constant(modulation),
            packet_size: RandomVariable::constant(size),
            ..Default::default()
        }
    }

    /// Run one generator on a scheduler until `limit`, recording
    /// (time, mode) after each firing
    fn run(
        generator: &mut MarkovTrafficGenerator,
        sockets: &mut MockSocketFactory,
        limit: SimTime,
    ) -> Vec<(SimTime, TrafficMode)> {
        let mut scheduler = Scheduler::new();
        let mut trace = Vec::new();

        generator.start(&mut scheduler.timer_for(()), sockets).unwrap();
        trace.push((scheduler.now(), generator.mode().unwrap()));

        scheduler.run_until(limit, |s, _, ()| {
            generator.fire(&mut s.timer_for(())).unwrap();
            trace.push((s.now(), generator.mode().unwrap()));
        });
        trace
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = MarkovTrafficConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.packet_size, RandomVariable::constant(2000.0));
        assert_eq!(config.min_packet_size, 20);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let config = constant_config(-1.0, 1.0, 1.0, 100.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTraffic { name: "mode1_delay", .. })
        ));

        let config = constant_config(1.0, 1.0, 1.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTraffic { name: "packet_size", .. })
        ));

        // truncated draws from [0, 20) stay below the minimum
        let config = MarkovTrafficConfig {
            packet_size: RandomVariable::Uniform { min: 0.0, max: 20.0 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTraffic { name: "packet_size", .. })
        ));

        let config = constant_config(1e20, 1.0, 1.0, 100.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTraffic { name: "mode1_delay", .. })
        ));

        let config = MarkovTrafficConfig {
            mode2_delay: RandomVariable::Normal {
                mean: 1.0,
                std_dev: 0.5,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(MarkovTrafficGenerator::new(&config, flow(), 0, 0).is_err());
    }

    #[test]
    fn test_activation_flips_on_first_firing() {
        let config = constant_config(1.0, 2.0, 5.0, 100.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler: Scheduler<()> = Scheduler::new();

        assert!(!generator.is_running());
        assert_eq!(generator.mode(), None);

        // mode 1 with a zero interval, so the synchronous firing flips at once
        generator
            .start(&mut scheduler.timer_for(()), &mut sockets)
            .unwrap();
        assert!(generator.is_running());
        assert_eq!(generator.mode(), Some(TrafficMode::Two));
        assert_eq!(generator.stats().mode_switches, 1);
        assert_eq!(generator.last_switch(), Some(SimTime::ZERO));
        assert_eq!(generator.modulation_interval(), Some(Duration::from_secs(5)));
        assert_eq!(sockets.sent().len(), 1);
        assert_eq!(scheduler.peek_time(), Some(SimTime::from_secs(2)));
    }

    #[test]
    fn test_mode_schedule_follows_modulation_interval() {
        let config = constant_config(1.0, 2.0, 5.0, 100.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();

        let trace = run(&mut generator, &mut sockets, SimTime::from_secs(14));

        let secs: Vec<(u64, u8)> = trace
            .iter()
            .map(|(t, m)| (t.as_duration().as_secs(), m.number()))
            .collect();
        // flip to mode 2 at t=0, back to mode 1 at the first firing five
        // seconds later (t=6), mode 2 again at t=11
        assert_eq!(
            secs,
            vec![
                (0, 2),
                (2, 2),
                (4, 2),
                (6, 1),
                (7, 1),
                (8, 1),
                (9, 1),
                (10, 1),
                (11, 2),
                (13, 2),
            ]
        );
        assert_eq!(generator.stats().mode_switches, 3);
        assert_eq!(generator.stats().packets_sent, trace.len() as u64);
    }

    #[test]
    fn test_flip_only_after_interval_elapsed() {
        let config = MarkovTrafficConfig {
            mode1_delay: RandomVariable::Exponential {
                mean: 0.3,
                bound: None,
            },
            mode2_delay: RandomVariable::Uniform { min: 0.1, max: 0.9 },
            modulation_interval: RandomVariable::Uniform { min: 1.0, max: 4.0 },
            ..Default::default()
        };
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 3, 11).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler = Scheduler::new();

        generator
            .start(&mut scheduler.timer_for(()), &mut sockets)
            .unwrap();

        let mut flips = 0;
        while scheduler.now() < SimTime::from_secs(60) {
            let (_, ()) = scheduler.pop().unwrap();
            let before_mode = generator.mode().unwrap();
            let before_switch = generator.last_switch().unwrap();
            let interval = generator.modulation_interval().unwrap();

            generator.fire(&mut scheduler.timer_for(())).unwrap();
            let elapsed = scheduler.now().since(before_switch);

            if generator.mode().unwrap() != before_mode {
                flips += 1;
                assert!(elapsed >= interval);
                assert_eq!(generator.last_switch(), Some(scheduler.now()));
            } else {
                assert!(elapsed < interval);
            }
        }
        assert!(flips > 5);
        assert_eq!(generator.stats().mode_switches, flips);
    }

    #[test]
    fn test_packet_sizes_respect_minimum() {
        let config = MarkovTrafficConfig {
            mode1_delay: RandomVariable::constant(0.01),
            mode2_delay: RandomVariable::constant(0.01),
            packet_size: RandomVariable::Uniform { min: 0.0, max: 40.0 },
            ..Default::default()
        };
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 5).unwrap();
        let mut sockets = MockSocketFactory::new();
        run(&mut generator, &mut sockets, SimTime::from_secs(2));

        let sent = sockets.sent();
        assert!(sent.len() > 100);
        assert!(sent.iter().all(|s| s.size >= MIN_PACKET_SIZE as usize && s.size < 40));
        assert!(generator.stats().size_rejections > 0);
    }

    #[test]
    fn test_rejection_budget_is_fatal() {
        let config = MarkovTrafficConfig {
            packet_size: RandomVariable::Uniform { min: 0.0, max: 20.5 },
            max_size_draws: 1,
            ..Default::default()
        };
        // almost every draw is below 20, so some firing exhausts the budget
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 9).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler = Scheduler::new();

        let mut result = generator.start(&mut scheduler.timer_for(()), &mut sockets);
        for _ in 0..100 {
            if result.is_err() {
                break;
            }
            scheduler.pop();
            result = generator.fire(&mut scheduler.timer_for(()));
        }
        assert!(matches!(
            result,
            Err(TrafficError::SizeRejectionExhausted {
                attempts: 1,
                minimum: 20
            })
        ));
    }

    #[test]
    fn test_send_failures_do_not_stop_schedule() {
        let config = constant_config(1.0, 1.0, 100.0, 100.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();
        sockets.set_fail_sends(true);

        let trace = run(&mut generator, &mut sockets, SimTime::from_secs(4));
        assert_eq!(trace.len(), 5);
        assert_eq!(generator.stats().send_failures, 5);
        assert_eq!(generator.stats().packets_sent, 0);
        assert!(generator.pending_event().is_some());
    }

    #[test]
    fn test_one_send_per_firing() {
        let config = constant_config(1.0, 1.0, 100.0, 64.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();

        let trace = run(&mut generator, &mut sockets, SimTime::from_secs(9));
        assert_eq!(trace.len(), 10);
        assert_eq!(sockets.attempts(), 10);
        assert!(sockets.sent().iter().all(|s| s.size == 64
            && s.from == NodeId(0)
            && s.to == NodeId(1)));
        assert_eq!(generator.stats().bytes_sent, 640);
    }

    #[test]
    fn test_stop_cancels_pending_event() {
        let config = constant_config(1.0, 1.0, 1.0, 100.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler = Scheduler::new();

        generator
            .start(&mut scheduler.timer_for(()), &mut sockets)
            .unwrap();
        let pending = generator.pending_event().unwrap();
        assert!(scheduler.is_pending(pending));

        assert!(generator.stop(&mut scheduler.timer_for(())));
        assert!(!scheduler.is_pending(pending));
        assert!(scheduler.pop().is_none());
        assert!(!generator.is_running());

        // stopping twice is harmless, firing while stopped is refused
        assert!(!generator.stop(&mut scheduler.timer_for(())));
        assert!(matches!(
            generator.fire(&mut scheduler.timer_for(())),
            Err(TrafficError::NotRunning)
        ));
        assert_eq!(sockets.sent().len(), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let config = constant_config(1.0, 1.0, 1.0, 100.0);
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler = Scheduler::new();

        generator.start(&mut scheduler.timer_for(()), &mut sockets).unwrap();
        assert!(matches!(
            generator.start(&mut scheduler.timer_for(()), &mut sockets),
            Err(TrafficError::AlreadyRunning)
        ));
        generator.stop(&mut scheduler.timer_for(()));
        scheduler.advance_to(SimTime::from_secs(3));

        // the restart resets the switch clock and flips straight away again
        generator.start(&mut scheduler.timer_for(()), &mut sockets).unwrap();
        assert_eq!(generator.mode(), Some(TrafficMode::Two));
        assert_eq!(generator.last_switch(), Some(SimTime::from_secs(3)));
        assert_eq!(generator.stats().mode_switches, 2);
    }

    #[test]
    fn test_huge_delay_is_an_error() {
        let config = MarkovTrafficConfig {
            mode2_delay: RandomVariable::Uniform {
                min: 1.0,
                max: 1e30,
            },
            ..Default::default()
        };
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new();
        let mut scheduler: Scheduler<()> = Scheduler::new();

        let result = generator.start(&mut scheduler.timer_for(()), &mut sockets);
        assert!(matches!(
            result,
            Err(TrafficError::DelayOutOfRange {
                what: "mode 2 delay",
                ..
            })
        ));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_bind_failure_leaves_generator_inactive() {
        let config = MarkovTrafficConfig::default();
        let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, 1).unwrap();
        let mut sockets = MockSocketFactory::new().refuse(NodeId(0));
        let mut scheduler: Scheduler<()> = Scheduler::new();

        let result = generator.start(&mut scheduler.timer_for(()), &mut sockets);
        assert!(matches!(result, Err(TrafficError::Transport(_))));
        assert!(!generator.is_running());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_same_seed_same_traffic() {
        let config = MarkovTrafficConfig {
            mode1_delay: RandomVariable::Exponential {
                mean: 0.2,
                bound: None,
            },
            packet_size: RandomVariable::Uniform {
                min: 20.0,
                max: 1500.0,
            },
            ..Default::default()
        };
        let sizes = |seed| {
            let mut generator = MarkovTrafficGenerator::new(&config, flow(), 0, seed).unwrap();
            let mut sockets = MockSocketFactory::new();
            run(&mut generator, &mut sockets, SimTime::from_secs(5));
            sockets.sent().iter().map(|s| s.size).collect::<Vec<_>>()
        };
        assert_eq!(sizes(4), sizes(4));
        assert_ne!(sizes(4), sizes(5));
    }
}
