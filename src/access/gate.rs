//! # Navigation Gate
//!
//! Client-side enforcement model: a small state machine driven by the UI
//! event loop. It renders a neutral wait state while identity and profile
//! resolution are in flight, counts grace ticks for unauthenticated
//! navigations, and discards resolution results that arrive after the
//! underlying identity has already changed. All actual decisions come from
//! [`decide`]; the gate only tracks the inputs.

use crate::access::classify::RoleFlags;
use crate::access::policy::{Decision, PolicyInputs, Surface, decide};
use crate::access::status::Status;

/// Handle tying an in-flight resolution to the identity generation it was
/// started for. Completing with a stale ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Identity provider or profile resolution still in flight.
    Loading,
    /// Provider reported no session; counting grace ticks.
    Anonymous { elapsed_ticks: u32 },
    /// Resolution complete for the current identity generation.
    Resolved { flags: RoleFlags, status: Status },
}

/// Per-session navigation gate state.
#[derive(Debug, Clone)]
pub struct NavigationGate {
    grace_ticks: u32,
    generation: u64,
    view_as_user: bool,
    state: SessionState,
}

impl NavigationGate {
    pub fn new(grace_ticks: u32) -> Self {
        Self {
            grace_ticks,
            generation: 0,
            view_as_user: false,
            state: SessionState::Loading,
        }
    }

    /// The identity (re)started resolving: sign-in, token refresh, or initial
    /// hydration. Any earlier in-flight resolution is superseded. The
    /// view-as-user override does not survive an identity change.
    pub fn begin_resolution(&mut self) -> ResolutionTicket {
        self.generation += 1;
        self.view_as_user = false;
        self.state = SessionState::Loading;
        ResolutionTicket {
            generation: self.generation,
        }
    }

    /// Deliver a finished resolution. Returns false, leaving the gate
    /// untouched, when the ticket belongs to a superseded identity.
    pub fn complete_resolution(
        &mut self,
        ticket: ResolutionTicket,
        flags: RoleFlags,
        status: Status,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "Discarding superseded session resolution"
            );
            return false;
        }
        self.state = SessionState::Resolved { flags, status };
        true
    }

    /// The provider reported no session. Starts the grace window.
    pub fn signed_out(&mut self) {
        self.generation += 1;
        self.view_as_user = false;
        self.state = SessionState::Anonymous { elapsed_ticks: 0 };
    }

    /// Advance the grace clock by one tick. Only meaningful while anonymous.
    pub fn tick(&mut self) {
        if let SessionState::Anonymous { elapsed_ticks } = &mut self.state {
            *elapsed_ticks = elapsed_ticks.saturating_add(1);
        }
    }

    /// Toggle the admin view-as-regular-user override.
    pub fn set_view_as_user(&mut self, view_as_user: bool) {
        self.view_as_user = view_as_user;
    }

    pub fn view_as_user(&self) -> bool {
        self.view_as_user
    }

    /// Evaluate the access policy for a navigation to `path` given the
    /// gate's current knowledge of the session.
    pub fn check(&self, path: &str) -> Decision {
        let inputs = match self.state {
            SessionState::Loading => PolicyInputs {
                surface: Surface::Navigation,
                is_loading: true,
                is_authenticated: false,
                is_admin: false,
                view_as_user: self.view_as_user,
                status: Status::NoProfile,
                elapsed_ticks: 0,
                grace_ticks: self.grace_ticks,
            },
            SessionState::Anonymous { elapsed_ticks } => PolicyInputs {
                surface: Surface::Navigation,
                is_loading: false,
                is_authenticated: false,
                is_admin: false,
                view_as_user: self.view_as_user,
                status: Status::NoProfile,
                elapsed_ticks,
                grace_ticks: self.grace_ticks,
            },
            SessionState::Resolved { flags, status } => PolicyInputs {
                surface: Surface::Navigation,
                is_loading: false,
                is_authenticated: true,
                is_admin: flags.is_admin,
                view_as_user: self.view_as_user,
                status,
                elapsed_ticks: 0,
                grace_ticks: self.grace_ticks,
            },
        };

        decide(path, &inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::policy::{DASHBOARD_ROUTE, SIGN_IN_ROUTE};

    fn approved() -> (RoleFlags, Status) {
        (RoleFlags::default(), Status::Approved)
    }

    fn admin() -> (RoleFlags, Status) {
        (
            RoleFlags {
                is_admin: true,
                is_mentor: false,
            },
            Status::Approved,
        )
    }

    #[test]
    fn waits_while_resolution_is_in_flight() {
        let mut gate = NavigationGate::new(3);
        gate.begin_resolution();

        assert_eq!(gate.check("/my-dashboard"), Decision::Wait);
        assert_eq!(gate.check("/"), Decision::Allow);
    }

    #[test]
    fn anonymous_redirects_only_after_grace_ticks() {
        let mut gate = NavigationGate::new(3);
        gate.signed_out();

        for _ in 0..3 {
            assert_eq!(gate.check("/my-dashboard"), Decision::Wait);
            gate.tick();
        }
        assert_eq!(
            gate.check("/my-dashboard"),
            Decision::RedirectTo(SIGN_IN_ROUTE)
        );
    }

    #[test]
    fn resolution_unlocks_the_session() {
        let mut gate = NavigationGate::new(3);
        let ticket = gate.begin_resolution();
        let (flags, status) = approved();

        assert!(gate.complete_resolution(ticket, flags, status));
        assert_eq!(gate.check("/my-dashboard"), Decision::Allow);
    }

    #[test]
    fn superseded_resolution_is_discarded() {
        let mut gate = NavigationGate::new(3);
        let stale = gate.begin_resolution();

        // Identity changes before the first resolution lands.
        let current = gate.begin_resolution();
        let (flags, status) = admin();

        assert!(!gate.complete_resolution(stale, flags, status));
        assert_eq!(gate.check("/admin/users"), Decision::Wait);

        let (flags, status) = approved();
        assert!(gate.complete_resolution(current, flags, status));
        assert_eq!(gate.check("/my-dashboard"), Decision::Allow);
    }

    #[test]
    fn sign_out_supersedes_in_flight_resolution() {
        let mut gate = NavigationGate::new(3);
        let stale = gate.begin_resolution();
        gate.signed_out();
        let (flags, status) = admin();

        assert!(!gate.complete_resolution(stale, flags, status));
        assert_eq!(gate.check("/my-dashboard"), Decision::Wait);
    }

    #[test]
    fn view_as_user_resets_on_identity_change() {
        let mut gate = NavigationGate::new(3);
        let ticket = gate.begin_resolution();
        let (flags, status) = admin();
        gate.complete_resolution(ticket, flags, status);

        gate.set_view_as_user(true);
        assert_eq!(gate.check("/admin/users"), Decision::RedirectTo("/"));

        let ticket = gate.begin_resolution();
        assert!(!gate.view_as_user());
        let (flags, status) = admin();
        gate.complete_resolution(ticket, flags, status);
        assert_eq!(gate.check("/admin/users"), Decision::Allow);
    }

    #[test]
    fn approved_session_is_bounced_off_pending() {
        let mut gate = NavigationGate::new(3);
        let ticket = gate.begin_resolution();
        let (flags, status) = approved();
        gate.complete_resolution(ticket, flags, status);

        assert_eq!(gate.check("/pending"), Decision::RedirectTo(DASHBOARD_ROUTE));
    }
}
