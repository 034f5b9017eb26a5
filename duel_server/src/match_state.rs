//! Authoritative match state.
//!
//! A single owned object holds the slot registry, each player's latest
//! report, the shared health pool, and the restart votes. The server's
//! receive loop is the only mutator, so one-slot-per-endpoint and
//! at-most-one-hit-per-report hold without any locking.

use std::net::SocketAddr;

use duel_shared::combat;
use duel_shared::net::{ClientMsg, OpponentView, ServerMsg, Slot, StateReport};
use tracing::{debug, info, warn};

/// Derived phase of the match as a whole. Never stored; registration,
/// damage, and restart votes are the only transition drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Fewer than two endpoints are bound.
    WaitingForPlayers,
    /// Both slots bound, both healths positive.
    InProgress,
    /// At least one health has reached zero. Only a full restart vote
    /// leaves this phase.
    Concluded,
}

/// Authoritative state for one two-player match.
#[derive(Debug)]
pub struct MatchState {
    endpoints: [Option<SocketAddr>; 2],
    reports: [Option<StateReport>; 2],
    health: [i32; 2],
    restart_votes: [bool; 2],
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            endpoints: [None; 2],
            reports: [None; 2],
            health: [combat::MAX_HEALTH; 2],
            restart_votes: [false; 2],
        }
    }

    /// Slot bound to `addr`, if any.
    pub fn slot_of(&self, addr: SocketAddr) -> Option<Slot> {
        self.endpoints
            .iter()
            .position(|e| *e == Some(addr))
            .map(|i| Slot(i as u8))
    }

    pub fn health(&self, slot: Slot) -> i32 {
        self.health[slot.index()]
    }

    pub fn phase(&self) -> MatchPhase {
        if self.endpoints.iter().any(|e| e.is_none()) {
            MatchPhase::WaitingForPlayers
        } else if self.health.iter().any(|h| *h <= 0) {
            MatchPhase::Concluded
        } else {
            MatchPhase::InProgress
        }
    }

    /// Processes one decoded datagram and returns the reply to send, if
    /// any. This is the whole request/reply cycle; the caller only does
    /// socket I/O and codec work around it.
    pub fn handle(&mut self, from: SocketAddr, msg: ClientMsg) -> Option<ServerMsg> {
        let slot = match self.slot_of(from) {
            Some(slot) => slot,
            // First contact binds a slot; the payload is not otherwise
            // processed for this datagram.
            None => {
                return self
                    .register(from)
                    .map(|slot| ServerMsg::Registered { slot })
            }
        };

        match msg {
            // Re-sent registration (the reply may have been lost):
            // answer with the already-assigned slot.
            ClientMsg::Register => Some(ServerMsg::Registered { slot }),
            ClientMsg::Restart => {
                self.vote_restart(slot);
                None
            }
            ClientMsg::Report(report) => self.apply_report(slot, report),
        }
    }

    fn register(&mut self, addr: SocketAddr) -> Option<Slot> {
        match self.endpoints.iter().position(|e| e.is_none()) {
            Some(i) => {
                self.endpoints[i] = Some(addr);
                let slot = Slot(i as u8);
                info!(%addr, slot = slot.0, "Player registered");
                Some(slot)
            }
            None => {
                // Both slots taken; silence is the only failure signal.
                warn!(%addr, "Dropping datagram from a third endpoint, match is full");
                None
            }
        }
    }

    fn vote_restart(&mut self, slot: Slot) {
        self.restart_votes[slot.index()] = true;
        debug!(slot = slot.0, "Restart vote cast");
        if self.restart_votes.iter().all(|v| *v) {
            self.health = [combat::MAX_HEALTH; 2];
            self.restart_votes = [false; 2];
            info!("Both players voted, health reset");
        }
    }

    fn apply_report(&mut self, slot: Slot, report: StateReport) -> Option<ServerMsg> {
        self.reports[slot.index()] = Some(report);

        let opponent = slot.opponent();
        let Some(opponent_report) = self.reports[opponent.index()] else {
            // Opponent has never reported: withhold the reply rather
            // than send a partial view.
            debug!(slot = slot.0, "Opponent has not reported yet");
            return None;
        };

        if report.is_attacking && combat::hit_connects(report.x, opponent_report.x) {
            let damage = combat::damage_against(opponent_report.is_guarding);
            self.health[opponent.index()] =
                combat::apply_damage(self.health[opponent.index()], damage);
            debug!(
                attacker = slot.0,
                damage,
                health = self.health[opponent.index()],
                "Hit connected"
            );
        }

        Some(ServerMsg::View(self.build_view(slot, opponent_report)))
    }

    fn build_view(&self, slot: Slot, opponent_report: StateReport) -> OpponentView {
        let opponent = slot.opponent();
        let (game_over, winner) = combat::outcome(self.health);
        OpponentView {
            x: opponent_report.x,
            y: opponent_report.y,
            is_jumping: opponent_report.is_jumping,
            is_attacking: opponent_report.is_attacking,
            is_guarding: opponent_report.is_guarding,
            moving: opponent_report.moving,
            frame: opponent_report.frame,
            health: self.health[opponent.index()],
            my_health: self.health[slot.index()],
            game_over,
            winner: winner.code(),
        }
    }
}
