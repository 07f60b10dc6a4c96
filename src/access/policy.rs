//! # Access Policy
//!
//! The single decision table of the gating layer. Both enforcement points,
//! the per-request API checks and the client navigation gate, call
//! [`decide`] with their current inputs; neither carries its own boolean
//! tree. Divergence between the two surfaces is a correctness bug, so the
//! only surface-specific behavior lives in the [`Surface`] branches here.

use crate::access::status::Status;

pub const SIGN_IN_ROUTE: &str = "/sign-in";
pub const SIGN_UP_ROUTE: &str = "/sign-up";
pub const HOME_ROUTE: &str = "/";
pub const PENDING_ROUTE: &str = "/pending";
pub const ONBOARDING_ROUTE: &str = "/onboarding";
pub const DASHBOARD_ROUTE: &str = "/my-dashboard";
pub const ADMIN_USERS_ROUTE: &str = "/admin/users";

/// Routes that need no authentication at all.
const PUBLIC_ROUTES: &[&str] = &[
    HOME_ROUTE,
    SIGN_IN_ROUTE,
    SIGN_UP_ROUTE,
    "/health",
    "/openapi.json",
];
const PUBLIC_PREFIXES: &[&str] = &["/sign-in/", "/sign-up/", "/docs"];

/// Routes where any authenticated identity suffices, status ignored. The
/// pending and onboarding pages must stay reachable for the very users whose
/// status would otherwise bounce them there.
const AUTH_ONLY_ROUTES: &[&str] = &[PENDING_ROUTE, ONBOARDING_ROUTE];
const AUTH_ONLY_PREFIXES: &[&str] = &["/onboarding/", "/api/participant", "/api/account"];

const ADMIN_PREFIXES: &[&str] = &["/admin", "/api/admin"];

/// Pages an approved user has no business lingering on.
const PRE_APPROVAL_ROUTES: &[&str] = &[SIGN_IN_ROUTE, SIGN_UP_ROUTE, PENDING_ROUTE];

/// Access tier a route belongs to. The four sets are disjoint; Standard is
/// everything not otherwise classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    AuthOnly,
    Admin,
    Standard,
}

/// Classify a path by exact match or prefix match.
pub fn classify_route(path: &str) -> RouteClass {
    if PUBLIC_ROUTES.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Public;
    }
    if ADMIN_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Admin;
    }
    if AUTH_ONLY_ROUTES.contains(&path) || AUTH_ONLY_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::AuthOnly;
    }
    RouteClass::Standard
}

/// Which enforcement point is asking. The API resolves synchronously and
/// answers with status codes; navigation may wait and answers with redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Api,
    Navigation,
}

/// Everything the policy is allowed to look at.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInputs {
    pub surface: Surface,
    /// Auth state still hydrating. Always false on the API surface.
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub is_admin: bool,
    /// Session-scoped admin override: browse with regular-user privileges.
    pub view_as_user: bool,
    pub status: Status,
    /// Ticks elapsed since an unauthenticated navigation began waiting.
    pub elapsed_ticks: u32,
    /// Grace window tolerating identity-provider hydration races.
    pub grace_ticks: u32,
}

impl PolicyInputs {
    /// Inputs for a server-side API check, which never waits or redirects.
    pub fn api(is_authenticated: bool, is_admin: bool, view_as_user: bool, status: Status) -> Self {
        Self {
            surface: Surface::Api,
            is_loading: false,
            is_authenticated,
            is_admin,
            view_as_user,
            status,
            elapsed_ticks: 0,
            grace_ticks: 0,
        }
    }
}

/// Why a request was denied; the enforcement point maps this to 401/403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Suspend rendering until auth state resolves or the grace window runs
    /// out. Never produced for the API surface.
    Wait,
    RedirectTo(&'static str),
    Deny(DenyReason),
}

/// Decide access for a route.
///
/// Rules apply in order; the first that matches wins. On the API surface the
/// navigation outcomes project onto status codes: waiting collapses into an
/// immediate 401 and every redirect becomes a 403.
pub fn decide(path: &str, inputs: &PolicyInputs) -> Decision {
    let class = classify_route(path);

    // 1. Public routes are open, even while auth state is still loading.
    if class == RouteClass::Public {
        return Decision::Allow;
    }

    // 2. Navigation suspends while auth state hydrates. The API has no
    //    loading state; each request resolves synchronously.
    if inputs.is_loading && inputs.surface == Surface::Navigation {
        return Decision::Wait;
    }

    // 3. No identity: terminal 401 for the API; navigation holds for the
    //    grace window before redirecting to sign-in.
    if !inputs.is_authenticated {
        return match inputs.surface {
            Surface::Api => Decision::Deny(DenyReason::Unauthenticated),
            Surface::Navigation => {
                if inputs.elapsed_ticks < inputs.grace_ticks {
                    Decision::Wait
                } else {
                    Decision::RedirectTo(SIGN_IN_ROUTE)
                }
            }
        };
    }

    let is_admin = inputs.is_admin && !inputs.view_as_user;

    // 4. Admin routes without admin privilege.
    if class == RouteClass::Admin && !is_admin {
        return match inputs.surface {
            Surface::Api => Decision::Deny(DenyReason::Forbidden),
            Surface::Navigation => Decision::RedirectTo(HOME_ROUTE),
        };
    }

    // 5. Admins pass everywhere, except that navigation bounces them off the
    //    pending page to the review queue they should be working instead.
    if is_admin {
        if inputs.surface == Surface::Navigation && path == PENDING_ROUTE {
            return Decision::RedirectTo(ADMIN_USERS_ROUTE);
        }
        return Decision::Allow;
    }

    // 6. No profile yet: everything except the auth-only pages funnels into
    //    onboarding.
    if inputs.status == Status::NoProfile && class != RouteClass::AuthOnly {
        return match inputs.surface {
            Surface::Api => Decision::Deny(DenyReason::Forbidden),
            Surface::Navigation => Decision::RedirectTo(ONBOARDING_ROUTE),
        };
    }

    // 7. Awaiting or refused approval: parked on the pending page.
    if matches!(inputs.status, Status::Pending | Status::Rejected) && class != RouteClass::AuthOnly
    {
        return match inputs.surface {
            Surface::Api => Decision::Deny(DenyReason::Forbidden),
            Surface::Navigation => Decision::RedirectTo(PENDING_ROUTE),
        };
    }

    // 8. Approved users do not linger on pre-approval screens.
    if inputs.status == Status::Approved
        && inputs.surface == Surface::Navigation
        && PRE_APPROVAL_ROUTES.contains(&path)
    {
        return Decision::RedirectTo(DASHBOARD_ROUTE);
    }

    // 9. Everything else is allowed.
    Decision::Allow
}
