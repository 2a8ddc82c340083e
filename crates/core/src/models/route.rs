use serde::{Deserialize, Serialize};

/// Top-level views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Budgets,
    Bills,
    Transactions,
    Categories,
    Profile,
}

impl Route {
    /// Login and registration are only for logged-out users.
    #[must_use]
    pub fn is_guest_only(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// Where navigation to `self` actually lands, given the session state.
    #[must_use]
    pub fn guard(self, authenticated: bool) -> Route {
        match (self.is_guest_only(), authenticated) {
            (true, true) => Route::Dashboard,
            (false, false) => Route::Login,
            _ => self,
        }
    }
}
