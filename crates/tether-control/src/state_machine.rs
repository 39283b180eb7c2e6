// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The pure lifecycle transition function.
//!
//! [`step`] maps the current [`MachineState`] and an incoming [`EventKind`]
//! to the next state and the ordered [`Command`]s the bridge must execute.
//! It touches no device, thread or application, so the whole table can be
//! checked without a host.
//!
//! | Event | Valid from | Result |
//! |---|---|---|
//! | Create | Uninitialized | Created |
//! | Resume | Created, Background | Foreground |
//! | FocusGained | Created, Background, Foreground | Foreground |
//! | FocusLost | Foreground | Background |
//! | Pause | Foreground | Background |
//! | Stop | Background | Background |
//! | Destroy | any but Destroyed | Destroyed |
//! | ExternalRequest, SubTaskResult, ConfigurationChanged, BackPressed, LowMemory | any live state | unchanged |
//!
//! Anything not in the table is a no-op. Besides the published state, the
//! machine tracks whether a foreground session (audio running, wake lock
//! held, surface active) is open. `Resume` opens one whenever none is open,
//! so a focus gain that arrived first does not leave the session closed.

use tether_core::lifecycle::{EventKind, LifecycleState};

/// The machine's full state: the published lifecycle state plus whether a
/// foreground session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MachineState {
    /// The state exposed to the rest of the system.
    pub lifecycle: LifecycleState,
    /// `true` between the `Resume` that opened a session and the `Pause` or
    /// `Destroy` that closed it.
    pub session_open: bool,
}

impl MachineState {
    /// A machine in `lifecycle` with no open session.
    pub const fn new(lifecycle: LifecycleState) -> Self {
        Self {
            lifecycle,
            session_open: false,
        }
    }
}

/// A unit of work the bridge executes as the result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Build the surface/renderer pair and the application handle, forward
    /// the launch request, then set up collaborators.
    CreateRuntime,
    /// Start audio, take the wake lock, resume the surface, `resume()` the app.
    OpenSession,
    /// Pause the surface, stop audio, release the wake lock, `suspend()` the app.
    CloseSession,
    /// `foreground()` the app.
    EnterForeground,
    /// `background()` the app.
    EnterBackground,
    /// Record that the host stopped the application. Nothing else happens.
    ObserveStop,
    /// Forward the event's request to `activity_intent`.
    ForwardIntent,
    /// Forward the event's result to `activity_result`.
    ForwardResult,
    /// Apply a configuration change to registered capabilities.
    ApplyConfiguration,
    /// Queue the back-signal handler on the render thread.
    QueueBackSignal,
    /// Forward a low-memory notification.
    ForwardMemoryWarning,
    /// Destroy the application handle and the surface/renderer pair.
    Teardown,
}

/// The result of feeding one event to [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The state after the event.
    pub next: MachineState,
    /// What to execute, in order.
    pub commands: Vec<Command>,
}

impl Step {
    fn ignore(current: MachineState) -> Self {
        Self {
            next: current,
            commands: Vec::new(),
        }
    }

    fn to(lifecycle: LifecycleState, session_open: bool, commands: Vec<Command>) -> Self {
        Self {
            next: MachineState {
                lifecycle,
                session_open,
            },
            commands,
        }
    }

    /// Returns `true` if the event had no effect at all.
    pub fn is_noop(&self, current: MachineState) -> bool {
        self.commands.is_empty() && self.next == current
    }
}

/// Computes the transition for `event` delivered in `current`.
pub fn step(current: MachineState, event: EventKind) -> Step {
    use Command::*;
    use LifecycleState::*;

    let MachineState {
        lifecycle,
        session_open,
    } = current;

    if lifecycle.is_terminal() {
        return Step::ignore(current);
    }

    match event {
        EventKind::Create => match lifecycle {
            Uninitialized => Step::to(Created, false, vec![CreateRuntime]),
            _ => Step::ignore(current),
        },
        EventKind::Destroy => {
            if lifecycle == Uninitialized {
                Step::to(Destroyed, false, Vec::new())
            } else if session_open {
                Step::to(Destroyed, false, vec![CloseSession, Teardown])
            } else {
                Step::to(Destroyed, false, vec![Teardown])
            }
        }
        _ if !lifecycle.is_live() => Step::ignore(current),

        EventKind::Resume => match (lifecycle, session_open) {
            (Created | Background, false) => {
                Step::to(Foreground, true, vec![OpenSession, EnterForeground])
            }
            (Created | Background, true) => Step::to(Foreground, true, vec![EnterForeground]),
            (Foreground, false) => Step::to(Foreground, true, vec![OpenSession]),
            _ => Step::ignore(current),
        },
        EventKind::FocusGained => match lifecycle {
            Created | Background => Step::to(Foreground, session_open, vec![EnterForeground]),
            _ => Step::ignore(current),
        },
        EventKind::FocusLost => match lifecycle {
            Foreground => Step::to(Background, session_open, vec![EnterBackground]),
            _ => Step::ignore(current),
        },
        EventKind::Pause => match (lifecycle, session_open) {
            (Foreground, true) => Step::to(Background, false, vec![EnterBackground, CloseSession]),
            (Foreground, false) => Step::to(Background, false, vec![EnterBackground]),
            _ => Step::ignore(current),
        },
        EventKind::Stop => match lifecycle {
            Background => Step::to(Background, session_open, vec![ObserveStop]),
            _ => Step::ignore(current),
        },
        EventKind::ExternalRequest => Step::to(lifecycle, session_open, vec![ForwardIntent]),
        EventKind::SubTaskResult => Step::to(lifecycle, session_open, vec![ForwardResult]),
        EventKind::ConfigurationChanged => {
            Step::to(lifecycle, session_open, vec![ApplyConfiguration])
        }
        EventKind::BackPressed => Step::to(lifecycle, session_open, vec![QueueBackSignal]),
        EventKind::LowMemory => Step::to(lifecycle, session_open, vec![ForwardMemoryWarning]),
    }
}

/// A record of what one event did, returned to the host by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The event that was applied.
    pub event: EventKind,
    /// State before the event.
    pub from: LifecycleState,
    /// State after the event.
    pub to: LifecycleState,
    /// Commands that were executed, in order.
    pub commands: Vec<Command>,
}

impl Transition {
    /// Returns `true` if the event changed nothing.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    const ALL_STATES: [LifecycleState; 6] = [
        Uninitialized,
        Created,
        Foreground,
        Background,
        Suspended,
        Destroyed,
    ];

    /// The published-state column of the table.
    fn expected_state(from: LifecycleState, event: EventKind) -> LifecycleState {
        match (from, event) {
            (Destroyed, _) => Destroyed,
            (_, EventKind::Destroy) => Destroyed,
            (Uninitialized, EventKind::Create) => Created,
            (Created | Background, EventKind::Resume) => Foreground,
            (Created | Background | Foreground, EventKind::FocusGained) => Foreground,
            (Foreground, EventKind::FocusLost) => Background,
            (Foreground, EventKind::Pause) => Background,
            (state, _) => state,
        }
    }

    fn run(events: &[EventKind]) -> (MachineState, Vec<Command>) {
        let mut state = MachineState::default();
        let mut commands = Vec::new();
        for &event in events {
            let step = step(state, event);
            commands.extend(step.commands);
            state = step.next;
        }
        (state, commands)
    }

    #[test]
    fn test_every_state_event_pair_matches_the_table() {
        for from in ALL_STATES {
            for session_open in [false, true] {
                for event in EventKind::ALL {
                    let current = MachineState {
                        lifecycle: from,
                        session_open,
                    };
                    let next = step(current, event).next;
                    assert_eq!(
                        next.lifecycle,
                        expected_state(from, event),
                        "{from:?} (session {session_open}) + {event:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_random_walks_stay_on_the_table_and_pair_sessions() {
        // Small deterministic LCG so the walk is reproducible.
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            let mut state = MachineState::default();
            let mut opens = 0;
            let mut closes = 0;
            for _ in 0..24 {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let event = EventKind::ALL[(seed >> 33) as usize % EventKind::ALL.len()];
                let step = step(state, event);
                assert_eq!(step.next.lifecycle, expected_state(state.lifecycle, event));
                for command in &step.commands {
                    match command {
                        Command::OpenSession => {
                            assert!(!state.session_open, "session opened twice");
                            opens += 1;
                        }
                        Command::CloseSession => {
                            assert!(state.session_open, "closed a session that was not open");
                            closes += 1;
                        }
                        _ => {}
                    }
                }
                state = step.next;
            }
            let final_step = step(state, EventKind::Destroy);
            if final_step.commands.contains(&Command::CloseSession) {
                closes += 1;
            }
            assert_eq!(opens, closes);
        }
    }

    #[test]
    fn test_resume_twice_is_idempotent() {
        let (once, once_commands) = run(&[EventKind::Create, EventKind::Resume]);
        let (twice, twice_commands) =
            run(&[EventKind::Create, EventKind::Resume, EventKind::Resume]);

        assert_eq!(once, twice);
        assert_eq!(once_commands, twice_commands);
    }

    #[test]
    fn test_focus_before_resume_still_opens_the_session() {
        let (state, commands) = run(&[
            EventKind::Create,
            EventKind::FocusGained,
            EventKind::Resume,
        ]);

        assert_eq!(state.lifecycle, Foreground);
        assert!(state.session_open);
        assert_eq!(
            commands,
            vec![
                Command::CreateRuntime,
                Command::EnterForeground,
                Command::OpenSession
            ]
        );
    }

    #[test]
    fn test_pause_after_focus_loss_is_ignored_and_destroy_closes_the_session() {
        let (state, commands) = run(&[
            EventKind::Create,
            EventKind::Resume,
            EventKind::FocusLost,
            EventKind::Pause,
            EventKind::Resume,
            EventKind::FocusGained,
            EventKind::Destroy,
        ]);

        assert_eq!(state, MachineState::new(Destroyed));
        let opens = commands.iter().filter(|c| **c == Command::OpenSession).count();
        let closes = commands.iter().filter(|c| **c == Command::CloseSession).count();
        assert_eq!((opens, closes), (1, 1));
        assert_eq!(commands.last(), Some(&Command::Teardown));
    }

    #[test]
    fn test_pause_orders_background_before_close() {
        let (_, commands) = run(&[EventKind::Create, EventKind::Resume, EventKind::Pause]);
        assert_eq!(
            &commands[commands.len() - 2..],
            &[Command::EnterBackground, Command::CloseSession]
        );
    }

    #[test]
    fn test_nothing_happens_after_destroy() {
        for event in EventKind::ALL {
            let current = MachineState::new(Destroyed);
            assert!(step(current, event).is_noop(current), "{event:?}");
        }
    }

    #[test]
    fn test_payload_events_before_create_are_dropped() {
        let current = MachineState::default();
        for event in [
            EventKind::ExternalRequest,
            EventKind::SubTaskResult,
            EventKind::ConfigurationChanged,
            EventKind::BackPressed,
            EventKind::LowMemory,
            EventKind::Resume,
            EventKind::Pause,
        ] {
            assert!(step(current, event).is_noop(current), "{event:?}");
        }
    }

    #[test]
    fn test_destroy_before_create_has_no_teardown() {
        let step = step(MachineState::default(), EventKind::Destroy);
        assert_eq!(step.next.lifecycle, Destroyed);
        assert!(step.commands.is_empty());
    }

    #[test]
    fn test_stop_is_observational() {
        let current = MachineState {
            lifecycle: Background,
            session_open: true,
        };
        let step = step(current, EventKind::Stop);
        assert_eq!(step.next, current);
        assert_eq!(step.commands, vec![Command::ObserveStop]);
    }
}
